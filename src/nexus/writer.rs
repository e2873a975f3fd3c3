//! NEXUS format writer for a [Dataset].

use crate::model::{CharacterMatrix, Dataset, TaxaCollection, TreesBlock};
use crate::newick::NewickWriter;
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, CHARACTERS, DATA, DATATYPE, DEFAULT_GAP, DEFAULT_MATCHCHAR,
    DEFAULT_MISSING, DIMENSIONS, FORMAT, GAP, MATCHCHAR, MATRIX, MISSING, NCHAR, NEXUS_HEADER,
    NTAX, SYMBOLS, TAXA, TAXLABELS, TREE, TREES,
};
use crate::parser::utils::quote_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Statement indentation inside a block
const INDENT: &[u8] = b"    ";

/// Gap between a matrix row label and its sequence
const ROW_LABEL_GAP: usize = 4;

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================$=
/// Writer for a [Dataset] in NEXUS format.
///
/// # Format Structure
/// The writer produces the following structure:
/// - `#NEXUS` header, followed by optional `[ comment ]` lines
/// - `TAXA` block with dimensions and tax labels, if there are matrices
///   or trees
/// - one `CHARACTERS` block per matrix
/// - one `TREES` block per trees block, each tree as `tree name = newick;`
///
/// # Configuration
/// * [`with_simple(bool)`](Self::with_simple) - write one `DATA` block per
///   matrix carrying `NTAX`, without a `TAXA` block (default: `false`)
/// * [`with_rooting(bool)`](Self::with_rooting) - prefix each tree with
///   `[&R]`/`[&U]` (default: `true`)
/// * [`with_comment(String)`](Self::with_comment) - add a header comment
///
/// # Example
/// ```
/// use phylonex::nexus::NexusWriter;
///
/// let dataset = phylonex::read_dataset_str("(A,(B,C));")?;
/// let mut writer = NexusWriter::new(Vec::new());
/// writer.write_dataset(&dataset)?;
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert!(text.contains("tree 0 = [&U] (A,(B,C));"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct NexusWriter<W: Write> {
    out: W,
    simple: bool,
    write_rooting: bool,
    comments: Vec<String>,
    newick: NewickWriter,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Creates a new NEXUS writer for the given sink.
    ///
    /// # Arguments
    /// * `out` - The sink to write to, e.g. a `BufWriter<File>` or a `Vec<u8>`
    pub fn new(out: W) -> Self {
        Self {
            out,
            simple: false,
            write_rooting: true,
            comments: Vec::new(),
            newick: NewickWriter::new(),
        }
    }

    pub fn with_simple(mut self, simple: bool) -> Self {
        self.simple = simple;
        self
    }

    pub fn with_rooting(mut self, write_rooting: bool) -> Self {
        self.write_rooting = write_rooting;
        self
    }

    /// Adds a header comment; each line becomes its own `[ ... ]`.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comments.extend(comment.lines().map(str::to_string));
        self
    }

    /// Uses `newick` to compose the trees.
    pub fn with_newick_writer(mut self, newick: NewickWriter) -> Self {
        self.newick = newick;
        self
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl NexusWriter<BufWriter<File>> {
    /// Creates a writer to the file at `path`, creating or truncating it.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be created.
    pub fn for_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

// ============================================================================
// API (pub)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Writes a complete NEXUS document for `dataset` and flushes the sink.
    ///
    /// # Errors
    /// Returns an I/O error if writing fails
    pub fn write_dataset(&mut self, dataset: &Dataset) -> io::Result<()> {
        let taxa = dataset.taxa();
        self.header()?;

        let has_content = !dataset.char_matrices().is_empty() || !dataset.trees_blocks().is_empty();
        if has_content && !self.simple {
            self.taxa_block(taxa)?;
        }
        for matrix in dataset.char_matrices() {
            self.characters_block(matrix, taxa)?;
        }
        for block in dataset.trees_blocks() {
            self.trees_block(block, taxa)?;
        }
        self.out.flush()
    }
}

// ============================================================================
// Nexus Block & Command Writing (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Writes the "#NEXUS" header and comments, returning itself for chaining.
    fn header(&mut self) -> io::Result<&mut Self> {
        self.write_str(NEXUS_HEADER)?.newline()?.newline()?;
        if !self.comments.is_empty() {
            let comments = std::mem::take(&mut self.comments);
            for line in &comments {
                // "[ comment ]"
                self.write_all(b"[ ")?.write_str(line)?.write_all(b" ]")?.newline()?;
            }
            self.comments = comments;
            self.newline()?;
        }
        Ok(self)
    }

    /// Writes the TAXA block with dimensions and taxon labels, returning itself for chaining.
    fn taxa_block(&mut self, taxa: &TaxaCollection) -> io::Result<&mut Self> {
        self.begin(TAXA)?;

        // "    DIMENSIONS NTAX=n;"
        self.indent()?
            .write_str(DIMENSIONS)?
            .space()?
            .write_str(NTAX)?
            .equals()?
            .write_str(&taxa.len().to_string())?
            .semicolon_ln()?;

        // "    TAXLABELS" + one label per line
        self.indent()?.write_str(TAXLABELS)?.newline()?;
        for label in taxa.labels() {
            self.indent()?.indent()?.write_str(&quote_label(label))?.newline()?;
        }
        self.write_all(b"  ")?.semicolon_ln()?;

        self.end()
    }

    /// Writes a CHARACTERS (or, when simple, DATA) block, returning itself for chaining.
    fn characters_block(&mut self, matrix: &CharacterMatrix, taxa: &TaxaCollection) -> io::Result<&mut Self> {
        let alphabet = matrix.alphabet();
        let nchar = matrix.max_row_len();
        let gap = alphabet
            .gap_state()
            .map_or(DEFAULT_GAP, |id| alphabet.symbol(id));
        let missing = alphabet
            .missing_state()
            .map_or(DEFAULT_MISSING, |id| alphabet.symbol(id));

        self.begin(if self.simple { DATA } else { CHARACTERS })?;

        // "    DIMENSIONS [NTAX=n ]NCHAR=n;"
        self.indent()?.write_str(DIMENSIONS)?.space()?;
        if self.simple {
            self.write_str(NTAX)?
                .equals()?
                .write_str(&matrix.num_taxa().to_string())?
                .space()?;
        }
        self.write_str(NCHAR)?
            .equals()?
            .write_str(&nchar.to_string())?
            .semicolon_ln()?;

        // "    FORMAT DATATYPE=X [SYMBOLS="..."] GAP=- MISSING=? MATCHCHAR=.;"
        self.indent()?
            .write_str(FORMAT)?
            .space()?
            .write_str(DATATYPE)?
            .equals()?
            .write_str(matrix.data_type().keyword())?;
        if !matrix.data_type().is_molecular() {
            self.space()?
                .write_str(SYMBOLS)?
                .equals()?
                .write_all(b"\"")?
                .write_str(&alphabet.fundamental_symbols())?
                .write_all(b"\"")?;
        }
        self.space()?
            .key_char(GAP, gap)?
            .space()?
            .key_char(MISSING, missing)?
            .space()?
            .key_char(MATCHCHAR, DEFAULT_MATCHCHAR)?
            .semicolon_ln()?;

        // "    MATRIX" + "label    sequence" rows
        self.indent()?.write_str(MATRIX)?.newline()?;
        let rows: Vec<(String, String)> = matrix
            .rows()
            .map(|(taxon, states)| {
                let label = quote_label(taxa.label(taxon).unwrap_or_default()).into_owned();
                let sequence: String = states.iter().map(|&id| alphabet.symbol(id)).collect();
                (label, sequence)
            })
            .collect();
        let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
        for (label, sequence) in &rows {
            let label_padding = label_width - label.chars().count() + ROW_LABEL_GAP;
            let gap_padding = nchar - sequence.chars().count();
            self.write_str(label)?
                .write_str(&" ".repeat(label_padding))?
                .write_str(sequence)?
                .write_str(&gap.to_string().repeat(gap_padding))?
                .newline()?;
        }
        self.indent()?.semicolon_ln()?;

        self.end()
    }

    /// Writes a TREES block with one TREE command per tree, returning itself for chaining.
    fn trees_block(&mut self, block: &TreesBlock, taxa: &TaxaCollection) -> io::Result<&mut Self> {
        self.begin(TREES)?;

        // "    tree <name> = [&R] <newick>;"
        for (index, tree) in block.iter().enumerate() {
            let name = match tree.label() {
                Some(label) => quote_label(label).into_owned(),
                None => index.to_string(),
            };
            let newick = self.newick.compose_tree(tree, taxa);

            self.indent()?
                .write_str(&TREE.to_ascii_lowercase())?
                .space()?
                .write_str(&name)?
                .space()?
                .equals()?
                .space()?;
            if self.write_rooting {
                self.write_all(if tree.is_rooted() { b"[&R]" } else { b"[&U]" })?
                    .space()?;
            }
            self.write_str(&newick)?.semicolon_ln()?;
        }

        self.end()
    }

    /// "BEGIN <block>;"
    fn begin(&mut self, block: &str) -> io::Result<&mut Self> {
        self.write_str(BLOCK_BEGIN)?.space()?.write_str(block)?.semicolon_ln()
    }

    /// "END;" followed by a blank line
    fn end(&mut self) -> io::Result<&mut Self> {
        self.write_str(BLOCK_END)?.semicolon_ln()?.newline()
    }

    /// "KEY=c"
    fn key_char(&mut self, key: &str, value: char) -> io::Result<&mut Self> {
        self.write_str(key)?.equals()?.write_str(value.encode_utf8(&mut [0; 4]))
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Appends a byte slice to the sink, returning itself for chaining.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.out.write_all(buf)?;
        Ok(self)
    }

    /// Appends a string slice to the sink, returning itself for chaining.
    fn write_str(&mut self, text: &str) -> io::Result<&mut Self> {
        self.write_all(text.as_bytes())
    }

    /// Appends a space character (' '), returning itself for chaining.
    fn space(&mut self) -> io::Result<&mut Self> {
        self.write_all(b" ")
    }

    /// Appends one level of indentation, returning itself for chaining.
    fn indent(&mut self) -> io::Result<&mut Self> {
        self.write_all(INDENT)
    }

    /// Appends a newline character ('\n'), returning itself for chaining.
    fn newline(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\n")
    }

    /// Appends a semicolon followed by a newline (';\n'), returning itself for chaining.
    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.write_all(b";\n")
    }

    /// Appends an equals sign ('='), returning itself for chaining.
    fn equals(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"=")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Tree};

    fn write(writer: NexusWriter<Vec<u8>>, dataset: &Dataset) -> String {
        let mut writer = writer;
        writer.write_dataset(dataset).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_empty_dataset_is_header_only() {
        let text = write(NexusWriter::new(Vec::new()).with_comment("made by hand"), &Dataset::new());
        assert_eq!(text, "#NEXUS\n\n[ made by hand ]\n\n");
    }

    #[test]
    fn test_tree_names_default_to_index() {
        let mut dataset = Dataset::new();
        let mut block = TreesBlock::new();
        block.push(Tree::new(Node::with_children(vec![Node::leaf("A"), Node::leaf("B")])).with_rooted(true));
        block.push(Tree::new(Node::leaf("A")).with_label("single leaf"));
        dataset.add_trees_block(block);

        let text = write(NexusWriter::new(Vec::new()), &dataset);
        assert!(text.contains("    tree 0 = [&R] (A,B);\n"));
        assert!(text.contains("    tree 'single leaf' = [&U] A;\n"));

        let text = write(NexusWriter::new(Vec::new()).with_rooting(false), &dataset);
        assert!(text.contains("    tree 0 = (A,B);\n"));
    }
}
