//! SQLite conversions for `Slot` and `Epoch`, stored as `INTEGER` columns.
use crate::{Epoch, Slot};
use rusqlite::{
    types::{FromSql, FromSqlError, ToSql, ToSqlOutput, ValueRef},
    Error,
};

macro_rules! impl_sqlite {
    ($type: ident) => {
        impl ToSql for $type {
            fn to_sql(&self) -> Result<ToSqlOutput, Error> {
                Ok(ToSqlOutput::from(self.as_u64() as i64))
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef) -> Result<Self, FromSqlError> {
                Ok(Self::new(i64::column_result(value)? as u64))
            }
        }
    };
}

impl_sqlite!(Slot);
impl_sqlite!(Epoch);
