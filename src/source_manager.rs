use hashbrown::HashMap;
use serde::Serialize;
use std::sync::Arc;
use std::{
    num::NonZeroU32,
    path::{Path, PathBuf},
};

/// Source ID for identifying source buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceId(pub(crate) NonZeroU32);

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

impl SourceId {
    /// create a new SourceId from a u32. panics if id is zero.
    pub(crate) fn new(id: u32) -> Self {
        SourceId(NonZeroU32::new(id).expect("SourceId must be non-zero"))
    }

    fn to_u32(self) -> u32 {
        self.0.get()
    }
}

/// Source ID and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLoc {
    pub source_id: SourceId,
    pub offset: u32,
}

impl Default for SourceLoc {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SourceLoc {
    pub fn new(source_id: SourceId, offset: u32) -> Self {
        SourceLoc { source_id, offset }
    }

    /// built-in source location (SourceId = 1, offset = 0)
    pub fn builtin() -> Self {
        SourceLoc::new(SourceId::new(1), 0)
    }

    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl std::fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceLoc(source_id={}, offset={})", self.source_id, self.offset)
    }
}

/// A byte range inside one source buffer, packed into 64 bits:
/// - bits 0-23: start offset (buffers up to 16 MiB are addressable)
/// - bits 24-39: length, clamped to 64 KiB
/// - bits 40-63: source id
///
/// The end location is exclusive: it points just past the last byte of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan(u64);

impl Default for SourceSpan {
    fn default() -> Self {
        Self::empty()
    }
}

impl SourceSpan {
    const OFFSET_BITS: u64 = 24;
    const LENGTH_BITS: u64 = 16;
    const SOURCE_ID_BITS: u64 = 24;

    const OFFSET_MASK: u64 = (1 << Self::OFFSET_BITS) - 1;
    const LENGTH_MASK: u64 = (1 << Self::LENGTH_BITS) - 1;
    const SOURCE_ID_MASK: u64 = (1 << Self::SOURCE_ID_BITS) - 1;

    const LENGTH_SHIFT: u64 = Self::OFFSET_BITS;
    const SOURCE_ID_SHIFT: u64 = Self::OFFSET_BITS + Self::LENGTH_BITS;

    /// Span from `start` up to (not including) `end`.
    /// Locations in different buffers collapse to an empty span at `start`.
    pub fn new(start: SourceLoc, end: SourceLoc) -> Self {
        let length = if start.source_id == end.source_id {
            end.offset.saturating_sub(start.offset)
        } else {
            0
        };
        Self::new_with_length(start.source_id, start.offset, length)
    }

    /// Packed span, or `None` when `offset` or `source_id` does not fit the packed layout
    pub fn try_new_with_length(source_id: SourceId, offset: u32, length: u32) -> Option<Self> {
        let id = source_id.to_u32() as u64;
        let offset = offset as u64;
        if offset > Self::OFFSET_MASK || id > Self::SOURCE_ID_MASK {
            return None;
        }
        let length = (length as u64).min(Self::LENGTH_MASK);
        Some(Self(offset | (length << Self::LENGTH_SHIFT) | (id << Self::SOURCE_ID_SHIFT)))
    }

    /// # Panics
    ///
    /// Panics if `offset` is past 16 MiB or `source_id` needs more than 24 bits.
    /// Use [`SourceSpan::try_new_with_length`] for locations that come from outside the AST.
    pub fn new_with_length(source_id: SourceId, offset: u32, length: u32) -> Self {
        match Self::try_new_with_length(source_id, offset, length) {
            Some(span) => span,
            None => panic!("{} offset {} does not fit a packed SourceSpan", source_id, offset),
        }
    }

    pub fn empty() -> Self {
        Self::new(SourceLoc::builtin(), SourceLoc::builtin())
    }

    fn offset(&self) -> u32 {
        (self.0 & Self::OFFSET_MASK) as u32
    }

    pub fn start(&self) -> SourceLoc {
        SourceLoc::new(self.source_id(), self.offset())
    }

    pub fn end(&self) -> SourceLoc {
        SourceLoc::new(self.source_id(), self.offset() + self.len())
    }

    pub fn len(&self) -> u32 {
        ((self.0 >> Self::LENGTH_SHIFT) & Self::LENGTH_MASK) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source_id(&self) -> SourceId {
        SourceId::new(((self.0 >> Self::SOURCE_ID_SHIFT) & Self::SOURCE_ID_MASK) as u32)
    }

    pub fn is_source_id_builtin(&self) -> bool {
        self.source_id().to_u32() == 1
    }

    /// Smallest span covering both; spans from different buffers keep `self`
    pub fn merge(self, other: SourceSpan) -> SourceSpan {
        let id = self.source_id();
        if id != other.source_id() {
            return self;
        }

        let start = self.offset().min(other.offset());
        let end = self.end().offset.max(other.end().offset);
        Self::new_with_length(id, start, end - start)
    }
}

impl std::fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}..{})", self.source_id(), self.offset(), self.end().offset)
    }
}

/// File information for tracking source buffers
#[derive(Debug)]
pub struct FileInfo {
    pub file_id: SourceId,
    pub path: PathBuf,
    pub size: u32,
    pub(crate) buffer: Arc<[u8]>,
    pub line_starts: Vec<u32>, // Line start offsets for efficient line lookup
}

/// Manages source buffers and resolves locations to line/column pairs
pub struct SourceManager {
    file_infos: Vec<FileInfo>,
    path_to_id: HashMap<PathBuf, SourceId>,
    next_file_id: u32,
}

impl Default for SourceManager {
    fn default() -> Self {
        Self {
            file_infos: Vec::new(),
            path_to_id: HashMap::new(),
            next_file_id: 2, // Start from 2, reserve 1 for built-ins
        }
    }
}

impl SourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buffer with raw bytes (UTF-8 assumed) and compute its line table
    pub fn add_buffer(&mut self, buffer: Vec<u8>, path: &str) -> SourceId {
        let file_id = SourceId::new(self.next_file_id);
        self.next_file_id += 1;

        let mut line_starts = vec![0];
        for (i, &byte) in buffer.iter().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }

        let path = PathBuf::from(path);
        self.path_to_id.insert(path.clone(), file_id);
        self.file_infos.push(FileInfo {
            file_id,
            path,
            size: buffer.len() as u32,
            buffer: Arc::from(buffer),
            line_starts,
        });

        file_id
    }

    /// Get file info for a given source ID
    pub fn get_file_info(&self, source_id: SourceId) -> Option<&FileInfo> {
        let id = source_id.to_u32();
        if id < 2 {
            return None;
        }
        self.file_infos.get(id as usize - 2)
    }

    /// Get source ID for a given file path
    pub fn get_file_id(&self, path: &str) -> Option<SourceId> {
        self.path_to_id.get(Path::new(path)).copied()
    }

    /// Get the source text for a given span, `None` for built-in or out-of-range spans
    pub fn get_source_text(&self, span: SourceSpan) -> Option<&str> {
        let info = self.get_file_info(span.source_id())?;
        let start = span.start().offset() as usize;
        let end = span.end().offset() as usize;
        let bytes = info.buffer.get(start..end)?;
        std::str::from_utf8(bytes).ok()
    }

    /// Get line and column for a source location (both 1-based)
    pub fn get_line_column(&self, loc: SourceLoc) -> Option<(u32, u32)> {
        let file_info = self.get_file_info(loc.source_id())?;
        let offset = loc.offset();

        // partition_point returns the index of the first line start greater than offset
        let idx = file_info.line_starts.partition_point(|&start| start <= offset);
        if idx == 0 {
            return Some((1, offset + 1));
        }

        let line_idx = idx - 1;
        let column = offset - file_info.line_starts[line_idx];
        Some((line_idx as u32 + 1, column + 1))
    }

    /// Get the presumed location (line, column, filename) for a source location
    pub fn get_presumed_location(&self, loc: SourceLoc) -> Option<(u32, u32, &str)> {
        let file_info = self.get_file_info(loc.source_id())?;
        let (line, column) = self.get_line_column(loc)?;
        let filename = file_info.path.to_str().unwrap_or("<invalid>");
        Some((line, column, filename))
    }
}
