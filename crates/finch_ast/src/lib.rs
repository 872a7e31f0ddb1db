//! A compact, position-independent binary encoding for JavaScript ASTs,
//! together with the operations needed to build, traverse and dump such
//! trees.
//!
//! The structure of the nodes cannot be described with ordinary Rust
//! data types: nodes are variable length and packed, with no alignment
//! padding. On the wire, a node is:
//!
//! 1. one tag byte, naming an entry of the schema table;
//! 2. `num_skips` 16-bit big-endian forward offsets, each counted from
//!    the first byte after the tag (the *payload start*);
//! 3. for inlined nodes, a varnum byte length followed by that many
//!    bytes of raw payload (identifier text, literal text, ...);
//! 4. `num_subtrees` fixed children, each a complete serialized node;
//! 5. zero or more trailing child sequences, terminated implicitly by
//!    the first skip.
//!
//! Trailing sequences have no termination tag: every node positioned
//! before the `End` skip target belongs to the sequence. Additional
//! skips partition the sequences into named groups and let consumers
//! jump over a subtree without walking it. Since every node that owns
//! trailing children carries at least the `End` skip, a reader can
//! advance past a node whose tag it does not otherwise understand.
//!
//! The 16-bit skip encoding limits a single function body to 64k of
//! serialized tree.

#[macro_use]
extern crate log;

pub mod dump;
pub mod read;
pub mod schema;
pub mod varnum;
pub mod write;

pub use dump::DumpOptions;
pub use schema::{NodeDef, Skip, Tag};

/// A byte offset inside an AST buffer.
pub type Offset = usize;

/// Width in bytes of one skip slot.
pub const SKIP_BYTES: usize = 2;

/// Largest value a skip slot can hold.
pub const MAX_SKIP: usize = 0xFFFF;

/// Errors raised while building a tree.
///
/// Anything else that can go wrong while writing (bad skip slot for a
/// tag, inline payload on a non-inlined tag) is a programmer error and
/// asserts instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AstError {
    /// A skip target too far from its node to fit the 16-bit encoding.
    /// The subtree must be split, or the input rejected.
    SkipOverflow { start: Offset, target: Offset },
}

/// A packed AST: a growable byte buffer owned by one builder at a time.
///
/// Offsets handed out while building stay valid only as long as no
/// later write inserts at an earlier position.
pub struct Ast {
    buf: Vec<u8>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Ast {
        Ast {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Adopt an externally produced stream, e.g. a dumped tree read
    /// back from storage. The stream is trusted: traversal of a
    /// malformed buffer may panic, but stays memory-safe.
    pub fn from_bytes(buf: Vec<u8>) -> Ast {
        Ast { buf }
    }

    pub fn len(&self) -> Offset {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Release the spare capacity kept for building.
    pub fn shrink_to_fit(&mut self) {
        self.buf.shrink_to_fit();
    }

    /// The tag whose byte sits at `tag_pos`.
    fn tag_at(&self, tag_pos: Offset) -> Tag {
        Tag::from_u8(self.buf[tag_pos]).expect("tag byte does not name a known node kind")
    }

    /// Insert raw bytes at `at`, shifting everything after.
    fn splice_in(&mut self, at: Offset, bytes: &[u8]) {
        assert!(at <= self.buf.len());
        self.buf.splice(at..at, bytes.iter().cloned());
    }
}

impl Default for Ast {
    fn default() -> Ast {
        Ast::new()
    }
}
