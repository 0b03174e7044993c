pub mod store;

pub use store::EntryStore;
