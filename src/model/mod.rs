//! Types that represent bank export data, such as `Transaction` and `Cell`, and the date helpers
//! that interpret it.
mod cell;
mod date;
mod mapping;
mod transaction;

pub use cell::Cell;
pub(crate) use cell::parse_decimal;
pub use date::{get_date, window_start, PAYMENT_DATE_FORMAT, REPORT_DATE_FORMAT, WINDOW_MONTHS};
pub(crate) use date::{parse_payment_date, parse_report_date};
pub use mapping::Mapping;
pub use transaction::{mask_card, PaymentStatus, Transaction, TransactionColumn, Transactions};
