pub mod dashboard;
pub mod mutation;
pub mod proxy;
pub mod sync;

#[cfg(test)]
pub mod testing;
