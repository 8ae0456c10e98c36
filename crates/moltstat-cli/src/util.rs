use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use moltstat_analysis::{
    config::AnalysisConfig,
    store::{PostDump, PostStore},
};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)?;
        if let Output::File { path, .. } = &output {
            tracing::info!(path = %path.display(), "wrote output file");
        }
        Ok(())
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read every dump file into one deduplicated store
///
/// Files are merged in the order given, so a post present in several dumps
/// keeps the record from the last file that contains it.
///
/// # Errors
///
/// Returns error if any file cannot be opened or parsed as a post dump
pub fn load_post_store<P>(paths: &[P]) -> anyhow::Result<PostStore>
where
    P: AsRef<Path>,
{
    let mut store = PostStore::new();
    for path in paths {
        let path = path.as_ref();
        let dump: PostDump = read_json_file("post dump", path)?;
        let summary = store.extend_from_dump(dump);
        tracing::info!(
            path = %path.display(),
            inserted = summary.inserted,
            replaced = summary.replaced,
            skipped = summary.skipped,
            "merged post dump"
        );
    }
    tracing::info!(
        unique_posts = store.len(),
        skipped = store.skipped(),
        "loaded post store"
    );
    Ok(store)
}

/// Read the analysis configuration, falling back to defaults without a path
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed
pub fn load_analysis_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    match path {
        Some(path) => read_json_file("analysis config", path),
        None => Ok(AnalysisConfig::default()),
    }
}

/// Truncate `s` to at most `max_chars` characters
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use moltstat_analysis::post::Post;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write_dump(dir: &Path, name: &str, dump: &serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, serde_json::to_vec(dump).unwrap()).unwrap();
        path
    }

    fn upvotes_of(store: &PostStore, id: &str) -> i64 {
        Post::from_raw(store.get(id).unwrap()).upvotes
    }

    #[test]
    fn test_load_post_store_last_file_wins() {
        let tmp = TempDir::new().unwrap();
        let first = write_dump(
            tmp.path(),
            "first.json",
            &json!({"posts": [{"id": "a", "upvotes": 1}, {"id": "b", "upvotes": 2}]}),
        );
        let second = write_dump(
            tmp.path(),
            "second.json",
            &json!([{"id": "a", "upvotes": 10}, {"id": "c", "upvotes": 3}]),
        );

        let store = load_post_store(&[&first, &second]).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(upvotes_of(&store, "a"), 10);

        let store = load_post_store(&[&second, &first]).unwrap();
        assert_eq!(upvotes_of(&store, "a"), 1);
    }

    #[test]
    fn test_load_post_store_reports_bad_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_post_store(&[&path]).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));

        let missing = tmp.path().join("missing.json");
        assert!(load_post_store(&[&missing]).is_err());
    }

    #[test]
    fn test_merged_dump_reads_back() {
        let tmp = TempDir::new().unwrap();
        let first = write_dump(
            tmp.path(),
            "first.json",
            &json!({
                "fetched_at": "2026-01-30T00:00:00",
                "stats": {"api_calls": 1, "posts_fetched": 2, "errors": 0},
                "posts": [{"id": "b"}, {"id": "a"}],
            }),
        );
        let second = write_dump(tmp.path(), "second.json", &json!([{"id": "c"}, {"id": "a"}]));
        let store = load_post_store(&[&first, &second]).unwrap();

        let merged = tmp.path().join("merged.json");
        Output::save_json(&store.to_dump(), Some(merged.clone())).unwrap();

        let dump: PostDump = read_json_file("post dump", &merged).unwrap();
        assert_eq!(dump.total_posts, 3);
        assert_eq!(dump.fetched_at.as_deref(), Some("2026-01-30T00:00:00"));

        let reloaded = load_post_store(&[&merged]).unwrap();
        let ids = |s: &PostStore| s.iter().filter_map(|p| p.id()).collect::<Vec<_>>();
        assert_eq!(ids(&reloaded), ids(&store));
        assert_eq!(ids(&reloaded), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_analysis_config_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"top_submolts": 3}"#).unwrap();
        let config = load_analysis_config(Some(path.as_path())).unwrap();
        assert_eq!(config.top_submolts, 3);
        assert!(!config.exclude_spam);

        assert_eq!(
            load_analysis_config(None).unwrap(),
            AnalysisConfig::default()
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }
}
