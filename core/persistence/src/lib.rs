pub mod executor;

pub use executor::{
    do_with_transaction, readonly_transaction, AsDao, ConnType, DbExecutor, Error, InnerConnType,
    PoolType,
};
