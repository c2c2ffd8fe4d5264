//! Diesel SQL type definition and `FromSql` / `ToSql` implementations.
//!
//! `Geometry` maps to `Binary` (BLOB) in SQLite and to PostGIS's native
//! `geometry` type in PostgreSQL. Both store (E)WKB; values are decoded with
//! [`WireValueAdapter`] so nested SRIDs, Z ordinates and the nesting limit
//! are checked on every read.

#[cfg(any(feature = "sqlite", feature = "postgres"))]
use geowire_core::WireValueAdapter;

// ── SQL type ──────────────────────────────────────────────────────────────────

/// Diesel SQL type for a geometry column (stored as EWKB).
///
/// ```rust,ignore
/// table! {
///     features (id) {
///         id   -> Integer,
///         geom -> geowire_diesel::Geometry,
///     }
/// }
/// ```
#[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId, Debug, Clone, Copy)]
#[diesel(sqlite_type(name = "Binary"))]
#[diesel(postgres_type(name = "geometry"))]
pub struct Geometry;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(any(feature = "sqlite", feature = "postgres"))]
fn decode_blob(blob: &[u8]) -> std::result::Result<geowire_core::Geometry, BoxedError> {
    WireValueAdapter::default()
        .from_bytes(blob)
        .map_err(|e| Box::new(e) as BoxedError)
}

#[cfg(any(feature = "sqlite", feature = "postgres"))]
fn encode_blob(geom: &geowire_core::Geometry) -> std::result::Result<Vec<u8>, BoxedError> {
    WireValueAdapter::default()
        .to_bytes(geom)
        .map_err(|e| Box::new(e) as BoxedError)
}

// ── SQLite FromSql / ToSql ────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
mod sqlite_impls {
    use super::*;
    use diesel::deserialize::{self, FromSql};
    use diesel::serialize::{self, IsNull, Output, ToSql};
    use diesel::sql_types::Binary;
    use diesel::sqlite::Sqlite;
    // SQLite Output does not implement std::io::Write; blobs go through
    // `out.set_value(..)`.

    // --- Vec<u8> (raw EWKB bytes) ---

    impl FromSql<Geometry, Sqlite> for Vec<u8> {
        fn from_sql(
            bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
        ) -> deserialize::Result<Self> {
            <Vec<u8> as FromSql<Binary, Sqlite>>::from_sql(bytes)
        }
    }

    impl ToSql<Geometry, Sqlite> for Vec<u8> {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
            out.set_value(self.as_slice());
            Ok(IsNull::No)
        }
    }

    impl ToSql<Geometry, Sqlite> for [u8] {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
            out.set_value(self);
            Ok(IsNull::No)
        }
    }

    // --- geowire_core::Geometry ---

    impl FromSql<Geometry, Sqlite> for geowire_core::Geometry {
        fn from_sql(
            bytes: <Sqlite as diesel::backend::Backend>::RawValue<'_>,
        ) -> deserialize::Result<Self> {
            let blob = <Vec<u8> as FromSql<Binary, Sqlite>>::from_sql(bytes)?;
            super::decode_blob(&blob)
        }
    }

    impl ToSql<Geometry, Sqlite> for geowire_core::Geometry {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
            let blob = super::encode_blob(self)?;
            out.set_value(blob);
            Ok(IsNull::No)
        }
    }
}

// ── PostgreSQL FromSql / ToSql ────────────────────────────────────────────────

#[cfg(feature = "postgres")]
mod postgres_impls {
    use super::*;
    use diesel::deserialize::{self, FromSql};
    use diesel::pg::Pg;
    use diesel::serialize::{self, IsNull, Output, ToSql};
    use std::io::Write as IoWrite;

    // --- Vec<u8> (raw EWKB bytes) ---

    impl FromSql<Geometry, Pg> for Vec<u8> {
        fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
            Ok(bytes.as_bytes().to_vec())
        }
    }

    impl ToSql<Geometry, Pg> for Vec<u8> {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
            IoWrite::write_all(out, self)?;
            Ok(IsNull::No)
        }
    }

    impl ToSql<Geometry, Pg> for [u8] {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
            IoWrite::write_all(out, self)?;
            Ok(IsNull::No)
        }
    }

    // --- geowire_core::Geometry ---

    impl FromSql<Geometry, Pg> for geowire_core::Geometry {
        fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
            super::decode_blob(bytes.as_bytes())
        }
    }

    impl ToSql<Geometry, Pg> for geowire_core::Geometry {
        fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
            let blob = super::encode_blob(self)?;
            IoWrite::write_all(out, &blob)?;
            Ok(IsNull::No)
        }
    }
}
