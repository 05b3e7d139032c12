//! Data models for Velin

pub mod borrowing;
pub mod member;
pub mod renewal;
pub mod title;
pub mod unit;

// Re-export commonly used types
pub use borrowing::{Borrowing, BorrowingDetails, ReturnOutcome};
pub use member::Member;
pub use renewal::{RenewalDecision, RenewalRequest, RenewalStatus};
pub use title::Title;
pub use unit::Unit;
