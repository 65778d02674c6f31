pub mod boi;

pub use boi::BankOfIsraelProvider;
