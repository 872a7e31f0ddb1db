//! Traversing trees.
//!
//! A cursor is a plain byte offset. The reader trusts the buffer: the
//! operations below assert rather than recover when handed a
//! truncated or schema-inconsistent stream.

use schema::{Skip, Tag};
use varnum;

use ::{Ast, Offset, SKIP_BYTES};

/// Longest inline payload `get_num` will look at.
const NUM_SCRATCH: usize = 511;

impl Ast {
    /// Read the tag under the cursor and advance past it.
    pub fn fetch_tag(&self, pos: &mut Offset) -> Tag {
        assert!(*pos < self.buf.len());
        let tag = self.tag_at(*pos);
        *pos += 1;
        tag
    }

    /// With the cursor just past a tag, advance over the skip slots
    /// and any inline payload, leaving it at the first child (fixed or
    /// trailing).
    pub fn move_to_children(&self, pos: &mut Offset) {
        let def = self.tag_at(*pos - 1).def();
        *pos += SKIP_BYTES * def.num_skips;
        if def.has_varint {
            let (len, llen) = varnum::decode(&self.buf, *pos);
            *pos += llen;
            if def.has_inlined {
                *pos += len as usize;
            }
        }
    }

    /// Resolve a named skip of the node whose payload starts at
    /// `start`, as an absolute offset.
    pub fn get_skip(&self, start: Offset, skip: Skip) -> Offset {
        self.skip_at(start, skip.slot())
    }

    /// Resolve a skip by raw slot index.
    pub(crate) fn skip_at(&self, start: Offset, slot: usize) -> Offset {
        let at = start + slot * SKIP_BYTES;
        assert!(at + SKIP_BYTES <= self.buf.len());
        start + ((self.buf[at] as usize) << 8 | self.buf[at + 1] as usize)
    }

    /// The inline payload of the node whose payload starts at `start`.
    ///
    /// The view borrows the buffer; it stays valid while no write
    /// mutates the tree.
    pub fn get_inlined_data(&self, start: Offset) -> &[u8] {
        let (len, llen) = varnum::decode(&self.buf, start);
        &self.buf[start + llen..start + llen + len as usize]
    }

    /// Interpret the inline payload as a base-10 decimal.
    ///
    /// Follows the usual C library reading: the longest numeric prefix
    /// counts, and text with no such prefix reads as zero. Payloads
    /// beyond 511 bytes are truncated first.
    pub fn get_num(&self, start: Offset) -> f64 {
        let data = self.get_inlined_data(start);
        let data = if data.len() > NUM_SCRATCH {
            &data[..NUM_SCRATCH]
        } else {
            data
        };
        let text = String::from_utf8_lossy(data);
        let text = text.trim();
        for cut in (1..text.len() + 1).rev() {
            if !text.is_char_boundary(cut) {
                continue;
            }
            if let Ok(value) = text[..cut].parse::<f64>() {
                return value;
            }
        }
        0.0
    }

    /// Advance the cursor past one complete node, trailing sequences
    /// included.
    ///
    /// Only the `End` skip is consulted, so this works for any
    /// well-formed node, whether or not the caller understands the
    /// tag's extra skips.
    pub fn skip_tree(&self, pos: &mut Offset) {
        let tag = self.fetch_tag(pos);
        let def = tag.def();
        let start = *pos;
        self.move_to_children(pos);

        for _ in 0..def.num_subtrees {
            self.skip_tree(pos);
        }

        if def.num_skips > 0 {
            let end = self.get_skip(start, Skip::End);
            while *pos < end {
                self.skip_tree(pos);
            }
        }
    }
}
