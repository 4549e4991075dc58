use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tokio::fs;
use tokio::io::AsyncWriteExt as _;

use crate::model::{Book, ContentPart};

const MAX_DOWNLOAD_COPIES: u32 = 999;

/// Unlocked content, shown as preformatted plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookViewer {
    pub book_title: String,
    pub author: String,
    /// `None` when the book has a single part and is read as a whole.
    pub part_title: Option<String>,
    pub content: String,
}

impl BookViewer {
    pub fn open(book: &Book, part: &ContentPart) -> Self {
        let part_title = (book.parts.len() > 1).then(|| part.title.clone());
        Self {
            book_title: book.title.clone(),
            author: book.author.clone(),
            part_title,
            content: part.content.clone(),
        }
    }

    pub fn file_name(&self) -> String {
        self.numbered_file_name(1)
    }

    /// Copy 1 is the plain name; later copies get a ` (n)` suffix.
    fn numbered_file_name(&self, copy: u32) -> String {
        let stem = match &self.part_title {
            Some(part) => format!("{} - {} - {}", self.book_title, part, self.author),
            None => format!("{} - {}", self.book_title, self.author),
        };
        let stem = sanitize_file_stem(&stem);
        if copy > 1 {
            format!("{stem} ({copy}).txt")
        } else {
            format!("{stem}.txt")
        }
    }

    /// Writes the content into `dir` and returns the new file's path.
    /// Existing downloads are kept; the next free numbered name is used.
    pub async fn download(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create download dir: {}", dir.display()))?;

        let mut copy = 1;
        let (path, mut file) = loop {
            let path = dir.join(self.numbered_file_name(copy));
            match fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(err)
                    if err.kind() == std::io::ErrorKind::AlreadyExists
                        && copy < MAX_DOWNLOAD_COPIES =>
                {
                    copy += 1;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("create download: {}", path.display()));
                }
            }
        };

        file.write_all(self.content.as_bytes())
            .await
            .with_context(|| format!("write download: {}", path.display()))?;
        file.flush()
            .await
            .with_context(|| format!("flush download: {}", path.display()))?;

        tracing::info!(path = %path.display(), "downloaded book content");
        Ok(path)
    }

    /// Hands the content to the host's output for printing.
    pub fn print<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "{}", self.book_title).context("print title")?;
        writeln!(out, "{}", self.author).context("print author")?;
        if let Some(part) = &self.part_title {
            writeln!(out, "{part}").context("print part title")?;
        }
        writeln!(out).context("print separator")?;
        writeln!(out, "{}", self.content).context("print content")?;
        out.flush().context("flush printed content")?;
        Ok(())
    }
}

fn sanitize_file_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_owned()
}
