pub mod entry;

pub use entry::{Entry, EntryId, EntryInput, ProfitClass};
