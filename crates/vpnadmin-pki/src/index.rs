//! Read access to the easy-rsa index ledger.

use std::path::PathBuf;

use tracing::debug;
use vpnadmin_core::{ClientIdentity, ClientStatus, IndexRecord};

use crate::error::PkiError;

/// Reads and parses the index ledger.
///
/// The ledger is reread on every call. The toolchain rewrites it out from
/// under us on every issue/revoke, so caching here would only serve stale
/// state.
#[derive(Debug, Clone)]
pub struct IndexStore {
    index_file: PathBuf,
}

impl IndexStore {
    pub fn new(index_file: PathBuf) -> Self {
        Self { index_file }
    }

    /// All identities in the ledger, any status.
    pub async fn identities(&self) -> Result<Vec<ClientIdentity>, PkiError> {
        let records = self.records().await?;
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let name = record.common_name()?.to_string();
                Some(ClientIdentity {
                    name,
                    status: record.status,
                })
            })
            .collect())
    }

    /// Common names of all currently valid certificates.
    pub async fn list_valid_names(&self) -> Result<Vec<String>, PkiError> {
        let identities = self.identities().await?;
        let names: Vec<String> = identities
            .into_iter()
            .filter(|id| id.status == ClientStatus::Valid)
            .map(|id| id.name)
            .collect();
        debug!(count = names.len(), "Listed valid clients from index ledger");
        Ok(names)
    }

    /// Whether `name` has a currently valid certificate.
    pub async fn exists(&self, name: &str) -> Result<bool, PkiError> {
        Ok(self
            .list_valid_names()
            .await?
            .iter()
            .any(|existing| existing == name))
    }

    async fn records(&self) -> Result<Vec<IndexRecord>, PkiError> {
        let content = tokio::fs::read_to_string(&self.index_file)
            .await
            .map_err(|e| {
                PkiError::LedgerUnreadable(format!("{}: {}", self.index_file.display(), e))
            })?;

        let mut records = Vec::new();
        for line in content.lines() {
            if let Some(record) = IndexRecord::parse(line)
                .map_err(|e| PkiError::LedgerUnreadable(e.to_string()))?
            {
                records.push(record);
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ledger(content: &str) -> (tempfile::TempDir, IndexStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, IndexStore::new(path))
    }

    #[tokio::test]
    async fn test_only_valid_records_are_listed() {
        let (_dir, store) = ledger(
            "V\t330101000000Z\t\t01\tunknown\t/CN=alice\n\
             R\t330101000000Z\t240101000000Z\t02\tunknown\t/CN=bob\n\
             E\t200101000000Z\t\t03\tunknown\t/CN=carol\n\
             V\t330101000000Z\t\t04\tunknown\t/C=US/O=Acme/CN=dave\n",
        );
        let names = store.list_valid_names().await.unwrap();
        assert_eq!(names, vec!["alice", "dave"]);
    }

    #[tokio::test]
    async fn test_identities_carry_status() {
        let (_dir, store) = ledger(
            "V\t330101000000Z\t\t01\tunknown\t/CN=alice\n\
             R\t330101000000Z\t240101000000Z\t02\tunknown\t/CN=bob\n",
        );
        let identities = store.identities().await.unwrap();
        assert_eq!(identities.len(), 2);
        assert_eq!(identities[0].status, ClientStatus::Valid);
        assert_eq!(identities[1].status, ClientStatus::Revoked);
        assert_eq!(identities[1].name, "bob");
    }

    #[tokio::test]
    async fn test_exists() {
        let (_dir, store) = ledger("V\t330101000000Z\t\t01\tunknown\t/CN=alice\n");
        assert!(store.exists("alice").await.unwrap());
        assert!(!store.exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_file_is_ledger_unreadable() {
        let store = IndexStore::new(PathBuf::from("/nonexistent/index.txt"));
        let err = store.list_valid_names().await.unwrap_err();
        assert!(matches!(err, PkiError::LedgerUnreadable(_)));
    }

    #[tokio::test]
    async fn test_malformed_line_is_ledger_unreadable() {
        let (_dir, store) = ledger("V\tnot-enough-fields\n");
        let err = store.list_valid_names().await.unwrap_err();
        assert!(matches!(err, PkiError::LedgerUnreadable(_)));
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let (_dir, store) =
            ledger("V\t330101000000Z\t\t01\tunknown\t/CN=alice\n\n   \n");
        assert_eq!(store.list_valid_names().await.unwrap(), vec!["alice"]);
    }
}
