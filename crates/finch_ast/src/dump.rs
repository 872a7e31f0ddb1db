//! Diagnostic text dump.
//!
//! Depth-indented rendition of a tree, for humans chasing encoder or
//! parser bugs. The output is informational: it does not round-trip
//! and is free to change shape. Kept as its own traversal so that
//! schema changes never break rendering of the parts they don't touch.

use std::io::{self, Write};

use schema::Skip;

use ::{Ast, Offset};

/// Rendering options.
#[derive(Clone, Debug)]
pub struct DumpOptions {
    /// Print schema names. When disabled, nodes render as `TAG_<n>`,
    /// matching builds whose tables carry no name column.
    pub tag_names: bool,
}

impl Default for DumpOptions {
    fn default() -> DumpOptions {
        DumpOptions { tag_names: true }
    }
}

impl Ast {
    /// Dump the tree rooted at the start of the buffer.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut pos = 0;
        self.dump_tree(out, &mut pos, 0, &DumpOptions::default())
    }

    /// Dump one node and everything below it.
    pub fn dump_tree<W: Write>(
        &self,
        out: &mut W,
        pos: &mut Offset,
        depth: usize,
        options: &DumpOptions,
    ) -> io::Result<()> {
        let tag = self.fetch_tag(pos);
        let def = tag.def();
        let start = *pos;

        indent(out, depth)?;
        if options.tag_names {
            write!(out, "{}", def.name)?;
        } else {
            write!(out, "TAG_{}", tag as u8)?;
        }
        if def.has_inlined {
            write!(out, " {}", String::from_utf8_lossy(self.get_inlined_data(start)))?;
        }
        writeln!(out)?;

        self.move_to_children(pos);
        for _ in 0..def.num_subtrees {
            self.dump_tree(out, pos, depth + 1, options)?;
        }

        if def.num_skips > 0 {
            // The first skip always closes the last trailing sequence,
            // so the walk below reads until its target; the remaining
            // skips only annotate the grouping.
            let end = self.get_skip(start, Skip::End);
            comment_at_depth(out, depth + 1, "...")?;
            while *pos < end {
                for slot in (1..def.num_skips).rev() {
                    if *pos == self.skip_at(start, slot) {
                        comment_at_depth(out, depth + 1, &format!("{} ->", slot))?;
                        break;
                    }
                }
                self.dump_tree(out, pos, depth + 1, options)?;
            }
        }
        Ok(())
    }
}

fn indent<W: Write>(out: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        write!(out, "  ")?;
    }
    Ok(())
}

fn comment_at_depth<W: Write>(out: &mut W, depth: usize, text: &str) -> io::Result<()> {
    indent(out, depth)?;
    writeln!(out, "/* [{}] */", text)
}

#[cfg(test)]
mod tests {
    use schema::{Skip, Tag};
    use ::{Ast, DumpOptions};

    fn sample_if() -> Ast {
        let mut a = Ast::new();
        let start = a.begin_node(Tag::If);
        a.add_inlined(Tag::Ident, b"x");
        a.begin_node(Tag::Return);
        a.set_skip(start, Skip::IfTrueEnd).unwrap();
        a.begin_node(Tag::Break);
        a.set_skip(start, Skip::End).unwrap();
        a
    }

    #[test]
    fn dump_indents_and_annotates() {
        let a = sample_if();
        let mut out = Vec::new();
        a.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "If\n\
             \x20 Ident x\n\
             \x20 /* [...] */\n\
             \x20 Return\n\
             \x20 /* [1 ->] */\n\
             \x20 Break\n"
        );
    }

    #[test]
    fn dump_without_names_prints_raw_tags() {
        let a = sample_if();
        let mut pos = 0;
        let mut out = Vec::new();
        a.dump_tree(&mut out, &mut pos, 0, &DumpOptions { tag_names: false })
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&format!("TAG_{}\n", Tag::If as u8)));
        assert!(text.contains(&format!("TAG_{}", Tag::Ident as u8)));
    }
}
