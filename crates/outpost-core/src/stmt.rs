mod data;
pub use data::Data;

mod datetime;
pub use datetime::{format_date, format_datetime, parse_date, parse_datetime};

mod expr;
pub use expr::{Expr, ExprType};

mod expr_assert;
pub use expr_assert::ExprAssert;

mod expr_field;
pub use expr_field::ExprField;

mod expr_join;
pub use expr_join::{ExprJoin, JoinOp};

mod row;
pub use row::Row;

mod select;
pub use select::{Direction, OrderBy, SelectOptions};

mod set;
pub use set::{Join, JoinKind, Set};

mod value;
pub use value::{Number, Value};
