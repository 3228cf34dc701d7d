use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WeaveError};

/// Separators tried coarsest first: paragraph, line, sentence, word.
const RECURSIVE_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " "];
const CHARACTER_SEPARATORS: &[&str] = &["\n\n"];

/// A bounded piece of source text stored in the context index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    pub text: String,
}

impl DocumentChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Boundary preference used when a window has to be cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitterKind {
    /// Paragraph, line, sentence, then word boundaries.
    #[default]
    Recursive,
    /// Paragraph boundaries only.
    Character,
}

impl SplitterKind {
    fn separators(self) -> &'static [&'static str] {
        match self {
            SplitterKind::Recursive => RECURSIVE_SEPARATORS,
            SplitterKind::Character => CHARACTER_SEPARATORS,
        }
    }
}

impl fmt::Display for SplitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitterKind::Recursive => write!(f, "recursive"),
            SplitterKind::Character => write!(f, "character"),
        }
    }
}

impl FromStr for SplitterKind {
    type Err = WeaveError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "recursive" => Ok(SplitterKind::Recursive),
            "character" => Ok(SplitterKind::Character),
            other => Err(WeaveError::configuration(format!(
                "unknown splitter '{other}'"
            ))),
        }
    }
}

/// Validated chunk size and overlap, both counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkParams {
    size: usize,
    overlap: usize,
}

impl ChunkParams {
    pub fn new(size: usize, overlap: usize) -> Result<Self> {
        if size == 0 {
            return Err(WeaveError::configuration(
                "chunk size must be greater than zero",
            ));
        }
        if overlap >= size {
            return Err(WeaveError::configuration(format!(
                "chunk overlap ({overlap}) must be smaller than chunk size ({size})"
            )));
        }
        Ok(Self { size, overlap })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DocumentChunker {
    params: ChunkParams,
    splitter: SplitterKind,
}

impl DocumentChunker {
    pub fn new(params: ChunkParams, splitter: SplitterKind) -> Self {
        Self { params, splitter }
    }

    pub fn params(&self) -> ChunkParams {
        self.params
    }

    /// Splits `full_text` into chunks of at most `size` characters.
    ///
    /// Each chunk is a verbatim slice of the input and starts exactly
    /// `overlap` characters before the previous one ended, so stripping the
    /// leading overlap from every chunk after the first and concatenating
    /// yields the original text.
    pub fn chunk(&self, full_text: &str) -> Vec<DocumentChunk> {
        let chars: Vec<char> = full_text.chars().collect();
        let size = self.params.size;
        let overlap = self.params.overlap;

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let window_end = (start + size).min(chars.len());
            let end = if window_end == chars.len() {
                window_end
            } else {
                // The cut must land past `start + overlap` so the next chunk advances.
                self.find_break(&chars, start + overlap + 1, window_end)
                    .unwrap_or(window_end)
            };

            chunks.push(DocumentChunk::new(chars[start..end].iter().collect::<String>()));

            if end == chars.len() {
                break;
            }
            start = end - overlap;
        }

        chunks
    }

    /// Returns the latest cut in `[min_end, max_end]` that sits right after
    /// the coarsest separator present.
    fn find_break(&self, chars: &[char], min_end: usize, max_end: usize) -> Option<usize> {
        self.splitter.separators().iter().find_map(|separator| {
            let sep: Vec<char> = separator.chars().collect();
            (min_end..=max_end)
                .rev()
                .find(|&end| end >= sep.len() && chars[end - sep.len()..end] == sep[..])
        })
    }
}

/// Convenience wrapper validating parameters and chunking with the recursive splitter.
pub fn chunk(full_text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<DocumentChunk>> {
    let params = ChunkParams::new(chunk_size, overlap)?;
    Ok(DocumentChunker::new(params, SplitterKind::Recursive).chunk(full_text))
}
