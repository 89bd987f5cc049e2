use crate::adapters::items_from_json;
use crate::domain::model::RawItem;
use crate::domain::ports::{FieldNames, FileRequest, Storage};
use crate::utils::error::{GradeError, Result};
use crate::utils::validation::validate_file_extension;

pub const INPUT_EXTENSIONS: [&str; 2] = ["json", "csv"];

pub struct FileSource<'a, S: Storage> {
    storage: &'a S,
}

impl<'a, S: Storage> FileSource<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub async fn fetch(&self, request: &FileRequest) -> Result<Vec<RawItem>> {
        let extension = validate_file_extension("source.path", &request.path, &INPUT_EXTENSIONS)?;

        tracing::debug!("Reading posts from {}", request.path);
        let data = self.storage.read_file(&request.path).await?;

        let items = match extension.as_str() {
            "csv" => items_from_csv(&data, &request.fields)?,
            _ => items_from_json(serde_json::from_slice(&data)?, &request.fields)?,
        };
        tracing::debug!("Read {} posts from {}", items.len(), request.path);
        Ok(items)
    }
}

fn items_from_csv(data: &[u8], fields: &FieldNames) -> Result<Vec<RawItem>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
    let headers = reader.headers()?.clone();

    let column = |names: &[String]| {
        names
            .iter()
            .find_map(|name| headers.iter().position(|h| h.trim() == name.as_str()))
    };
    let text_col = column(fields.text.as_slice()).ok_or_else(|| GradeError::ProcessingError {
        message: format!(
            "CSV input has no text column (looked for: {})",
            fields.text.join(", ")
        ),
    })?;
    let id_col = column(fields.id.as_slice());

    let mut items = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let Some(text) = record.get(text_col) else {
            tracing::warn!("Ignoring CSV row {}: no text value", index + 1);
            continue;
        };
        let id = id_col
            .and_then(|col| record.get(col))
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string());
        items.push(RawItem::new(id, text));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                GradeError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn request(path: &str) -> FileRequest {
        FileRequest {
            path: path.to_string(),
            fields: FieldNames::default(),
        }
    }

    #[tokio::test]
    async fn test_reads_json_posts() {
        let storage = MockStorage::with_file(
            "posts.json",
            r#"[{"id_str": "10", "full_text": "First post"}, {"id_str": "11", "full_text": "Second"}]"#,
        )
        .await;

        let items = FileSource::new(&storage).fetch(&request("posts.json")).await.unwrap();
        assert_eq!(
            items,
            vec![RawItem::new("10", "First post"), RawItem::new("11", "Second")]
        );
    }

    #[tokio::test]
    async fn test_reads_csv_posts() {
        let storage = MockStorage::with_file(
            "posts.csv",
            "id,text\n1,\"Hello, world\"\n2,\"Line one\nLine two\"\n",
        )
        .await;

        let items = FileSource::new(&storage).fetch(&request("posts.csv")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], RawItem::new("1", "Hello, world"));
        assert_eq!(items[1].text, "Line one\nLine two");
    }

    #[tokio::test]
    async fn test_csv_without_text_column() {
        let storage = MockStorage::with_file("posts.csv", "id,body\n1,hi\n").await;
        let result = FileSource::new(&storage).fetch(&request("posts.csv")).await;
        assert!(matches!(result, Err(GradeError::ProcessingError { .. })));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let storage = MockStorage::default();
        let result = FileSource::new(&storage).fetch(&request("posts.txt")).await;
        assert!(matches!(
            result,
            Err(GradeError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let storage = MockStorage::default();
        let result = FileSource::new(&storage).fetch(&request("absent.json")).await;
        assert!(matches!(result, Err(GradeError::IoError(_))));
    }
}
