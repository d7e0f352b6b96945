//! Writes postings as plain-text files under `<base>/<YYYY-MM-DD>/`.

mod render;

pub use render::{format_posting, sanitize_filename};

use crate::postings::JobPosting;
use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct FileWriter {
    base_path: PathBuf,
}

impl FileWriter {
    /// Creates `base_path` (and parents) if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let base_path = base_path.into();
        create_dir(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn output_directory(&self, date: NaiveDate) -> PathBuf {
        self.base_path.join(date.format("%Y-%m-%d").to_string())
    }

    /// Writes one file per posting and returns the paths in input order.
    /// Existing files are never overwritten; a `_1`, `_2`, ... suffix is
    /// added instead.
    pub fn write_postings(
        &self,
        postings: &[JobPosting],
        date: NaiveDate,
    ) -> Result<Vec<PathBuf>, OutputError> {
        if postings.is_empty() {
            return Ok(Vec::new());
        }

        let directory = self.output_directory(date);
        create_dir(&directory)?;

        let generated_at = Local::now().naive_local();
        let mut written = Vec::with_capacity(postings.len());
        for posting in postings {
            let contents = format_posting(posting, generated_at);
            let path = write_unique(&directory, &render::posting_file_stem(posting), &contents)?;
            debug!(path = %path.display(), "wrote posting");
            written.push(path);
        }

        info!(
            files = written.len(),
            directory = %directory.display(),
            "wrote postings"
        );
        Ok(written)
    }
}

fn create_dir(path: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(path).map_err(|source| OutputError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

// `create_new` makes the existence check and the creation one atomic step.
fn write_unique(directory: &Path, stem: &str, contents: &str) -> Result<PathBuf, OutputError> {
    let mut counter = 0u32;
    loop {
        let file_name = if counter == 0 {
            format!("{stem}.txt")
        } else {
            format!("{stem}_{counter}.txt")
        };
        let path = directory.join(file_name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(contents.as_bytes())
                    .map_err(|source| OutputError::Write {
                        path: path.clone(),
                        source,
                    })?;
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => counter += 1,
            Err(source) => return Err(OutputError::Write { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "job-pipeline-output-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn posting(id: &str, company: &str, title: &str) -> JobPosting {
        JobPosting::builder("JSearch", id)
            .company(company)
            .title(title)
            .build()
            .unwrap()
    }

    #[test]
    fn writes_into_dated_directory_with_unique_names() {
        let base = scratch_dir("unique");
        let writer = FileWriter::new(&base).expect("writer");
        let date = NaiveDate::from_ymd_opt(2025, 9, 24).unwrap();

        let paths = writer
            .write_postings(
                &[
                    posting("1", "Acme, Inc.", "DevOps Engineer"),
                    posting("2", "Acme Inc", "DevOps  Engineer"),
                    posting("3", "Globex", "SRE"),
                ],
                date,
            )
            .expect("written");

        let dated = base.join("2025-09-24");
        assert_eq!(
            paths,
            vec![
                dated.join("Acme_Inc_DevOps_Engineer.txt"),
                dated.join("Acme_Inc_DevOps_Engineer_1.txt"),
                dated.join("Globex_SRE.txt"),
            ]
        );

        let again = writer
            .write_postings(&[posting("4", "Globex", "SRE")], date)
            .expect("written");
        assert_eq!(again, vec![dated.join("Globex_SRE_1.txt")]);

        let contents = fs::read_to_string(&paths[2]).expect("readable");
        assert!(contents.contains("Board Job ID: 3"));

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn empty_input_writes_nothing() {
        let base = scratch_dir("empty");
        let writer = FileWriter::new(&base).expect("writer");
        let date = NaiveDate::from_ymd_opt(2025, 9, 24).unwrap();

        assert!(writer.write_postings(&[], date).expect("ok").is_empty());
        assert!(!writer.output_directory(date).exists());
        assert!(writer.base_path().exists());

        fs::remove_dir_all(&base).ok();
    }
}
