//! Building trees.
//!
//! The writer is append-dominant: a node is opened with zeroed skip
//! slots, children are emitted behind it, and each slot is patched
//! exactly once as the owning sequence closes. No second pass over the
//! buffer is required. Insertion at an earlier offset is supported for
//! the handful of productions that only discover the parent node after
//! emitting a child; any such insertion shifts the bytes behind it, so
//! callers must re-derive payload-start offsets recorded before the
//! insertion point.

use schema::{Skip, Tag};
use varnum;

use ::{Ast, AstError, Offset, MAX_SKIP, SKIP_BYTES};

impl Ast {
    /// Open a node: append the tag byte and zeroed skip slots.
    ///
    /// Children are appended by the caller. Returns the payload start,
    /// the anchor to pass to `set_skip` when sequences close.
    pub fn begin_node(&mut self, tag: Tag) -> Offset {
        let def = tag.def();
        let start = self.buf.len();
        self.buf.push(tag as u8);
        let skipped = self.buf.len() + SKIP_BYTES * def.num_skips;
        self.buf.resize(skipped, 0);
        start + 1
    }

    /// Open a node at an arbitrary earlier offset, shifting everything
    /// behind it.
    ///
    /// The `End` skip is set to the current buffer length right away,
    /// so a node inserted with no further writes is well-formed with
    /// an empty trailing sequence.
    pub fn insert_node(&mut self, at: Offset, tag: Tag) -> Result<Offset, AstError> {
        let def = tag.def();
        let mut head = Vec::with_capacity(1 + SKIP_BYTES * def.num_skips);
        head.push(tag as u8);
        head.resize(1 + SKIP_BYTES * def.num_skips, 0);
        self.splice_in(at, &head);

        if def.num_skips > 0 {
            self.set_skip(at + 1, Skip::End)?;
        }
        Ok(at + 1)
    }

    /// Patch a skip slot of the node at `start` with the current
    /// buffer length, closing the sequence that ends here.
    pub fn set_skip(&mut self, start: Offset, skip: Skip) -> Result<Offset, AstError> {
        let target = self.buf.len();
        self.modify_skip(start, target, skip)
    }

    /// Patch a skip slot of the node at `start` with an explicit
    /// target offset.
    pub fn modify_skip(
        &mut self,
        start: Offset,
        target: Offset,
        skip: Skip,
    ) -> Result<Offset, AstError> {
        let def = self.tag_at(start - 1).def();
        assert!(
            skip.slot() < def.num_skips,
            "{:?} is not a skip of {}",
            skip,
            def.name
        );
        assert!(target >= start && target <= self.buf.len());

        let delta = target - start;
        if delta > MAX_SKIP {
            debug!(target: "ast", "skip target {} out of reach of node at {}", target, start);
            return Err(AstError::SkipOverflow { start, target });
        }

        let slot = start + skip.slot() * SKIP_BYTES;
        self.buf[slot] = (delta >> 8) as u8;
        self.buf[slot + 1] = (delta & 0xFF) as u8;
        Ok(target)
    }

    /// Append a node carrying a varnum-prefixed inline payload.
    /// Returns the payload start.
    pub fn add_inlined(&mut self, tag: Tag, data: &[u8]) -> Offset {
        assert!(tag.def().has_inlined, "{} has no inline payload", tag.def().name);
        let start = self.begin_node(tag);
        self.embed(start, data);
        start
    }

    /// Insert variant of `add_inlined`.
    pub fn insert_inlined(&mut self, at: Offset, tag: Tag, data: &[u8]) -> Result<Offset, AstError> {
        assert!(tag.def().has_inlined, "{} has no inline payload", tag.def().name);
        let start = self.insert_node(at, tag)?;
        self.embed(start, data);
        Ok(start)
    }

    /// Splice a varnum length and `data` into the buffer at `at`.
    fn embed(&mut self, at: Offset, data: &[u8]) {
        let mut payload = varnum::bytes(data.len() as u32);
        payload.extend_from_slice(data);
        self.splice_in(at, &payload);
    }
}

#[cfg(test)]
mod tests {
    use schema::{Skip, Tag};
    use ::{Ast, AstError};

    #[test]
    fn begin_node_reserves_skip_slots() {
        let mut a = Ast::new();
        let start = a.begin_node(Tag::Script);
        assert_eq!(start, 1);
        // Tag byte plus two zeroed skips.
        assert_eq!(a.as_bytes(), &[Tag::Script as u8, 0, 0, 0, 0][..]);
    }

    #[test]
    fn set_skip_writes_big_endian_deltas() {
        let mut a = Ast::new();
        let start = a.begin_node(Tag::Seq);
        for _ in 0..300 {
            a.begin_node(Tag::Nop);
        }
        let target = a.set_skip(start, Skip::End).unwrap();
        assert_eq!(target, a.len());
        // delta = 302 = 0x012E, stored network byte order.
        assert_eq!(&a.as_bytes()[1..3], &[0x01, 0x2E]);
        assert_eq!(a.get_skip(start, Skip::End), a.len());
    }

    #[test]
    fn skip_overflow_is_reported() {
        let mut a = Ast::new();
        let start = a.begin_node(Tag::Seq);
        for _ in 0..0x1_0000 {
            a.begin_node(Tag::Nop);
        }
        let err = a.set_skip(start, Skip::End).unwrap_err();
        assert_eq!(
            err,
            AstError::SkipOverflow {
                start: 1,
                target: a.len()
            }
        );
    }

    #[test]
    #[should_panic]
    fn foreign_skip_name_asserts() {
        let mut a = Ast::new();
        let start = a.begin_node(Tag::Seq);
        let _ = a.set_skip(start, Skip::TryCatch);
    }

    #[test]
    fn insert_node_closes_itself() {
        let mut a = Ast::new();
        a.add_inlined(Tag::Ident, b"x");
        // Wrap the existing expression into a sequence after the fact.
        let start = a.insert_node(0, Tag::Seq).unwrap();
        assert_eq!(start, 1);
        assert_eq!(a.get_skip(start, Skip::End), a.len());

        let mut pos = 0;
        a.skip_tree(&mut pos);
        assert_eq!(pos, a.len());
    }

    #[test]
    fn inlined_payload_round_trips() {
        let mut a = Ast::new();
        let start = a.add_inlined(Tag::String, b"hello, world");
        assert_eq!(a.get_inlined_data(start), b"hello, world");
    }
}
