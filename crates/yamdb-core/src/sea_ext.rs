use sea_orm::{
    ColumnTrait, DbErr, EntityTrait, QueryFilter, Select, SqlErr,
    sea_query::{Expr, Func, LikeExpr},
};

/// Case-insensitive substring filter.
pub trait ContainsIgnoreCase<E: EntityTrait> {
    fn contains_ignore_case(self, col: E::Column, needle: &str) -> Self;
}

impl<E> ContainsIgnoreCase<E> for Select<E>
where
    E: EntityTrait,
{
    fn contains_ignore_case(self, col: E::Column, needle: &str) -> Self {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        self.filter(
            Expr::expr(Func::lower(Expr::col(col.as_column_ref())))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// True when the error is a unique-constraint violation reported by the driver.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
