use crate::error::Result;

/// Abstract snapshot store interface (byte-level operations)
///
/// Different from sql::engine::Catalog which operates on tables.
pub trait Store {
    /// Replaces the snapshot stored under `name`
    fn set(&mut self, name: &str, snapshot: Vec<u8>) -> Result<()>;
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;
    /// Removes a snapshot; removing a missing one is not an error
    fn delete(&mut self, name: &str) -> Result<()>;
    /// Names of all stored snapshots, in ascending order
    fn names(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::{error::Result, storage::{file::FileStore, memory::MemoryStore}};

    fn test_point_opt(mut store: impl Store) -> Result<()> {
        assert_eq!(store.get("missing")?, None);

        store.set("users", vec![1, 2, 3, 4])?;
        assert_eq!(store.get("users")?, Some(vec![1, 2, 3, 4]));

        store.set("users", vec![5, 6, 7, 8])?;
        assert_eq!(store.get("users")?, Some(vec![5, 6, 7, 8]));

        store.delete("users")?;
        assert_eq!(store.get("users")?, None);
        store.delete("users")?;

        store.set("empty", vec![])?;
        assert_eq!(store.get("empty")?, Some(vec![]));
        Ok(())
    }

    fn test_names(mut store: impl Store) -> Result<()> {
        store.set("orders", b"o".to_vec())?;
        store.set("accounts", b"a".to_vec())?;
        store.set("users", b"u".to_vec())?;
        store.delete("orders")?;

        assert_eq!(store.names()?, vec!["accounts".to_string(), "users".to_string()]);
        Ok(())
    }

    #[test]
    fn test_memory() -> Result<()> {
        test_point_opt(MemoryStore::new())?;
        test_names(MemoryStore::new())?;
        Ok(())
    }

    #[test]
    fn test_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        test_point_opt(FileStore::new(dir.path().join("a"))?)?;
        test_names(FileStore::new(dir.path().join("b"))?)?;
        Ok(())
    }
}
