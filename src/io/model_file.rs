//! Model text loading and writing.
//!
//! The format is newline-delimited UTF-8. The first line is a header and is
//! skipped. Every following line up to the first blank line (or end of
//! stream) describes one node:
//!
//! ```text
//! <node_id>\t<base_value>\t<feature_id>:<yes_node_id>:<no_node_id>|...
//! ```
//!
//! The branch list may be empty. Branches can refer to nodes defined further
//! down, so loading is two-pass: every record is read and every node is
//! allocated before any edge is wired. The root is the node whose id appears
//! first in the stream.

use crate::config::ForestConfig;
use crate::core::constants::*;
use crate::core::error::{MalformedModelError, Result};
use crate::core::types::{BranchSide, FeatureId, NodeId, NodeIndex, Score};
use crate::forest::{Forest, ResolvedBranch, ResolvedNode};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One `feature:yes:no` triple as written in the model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBranchRecord {
    /// Feature tested at this branch
    pub feature_id: FeatureId,
    /// Node taken when the feature is present
    pub yes_node_id: NodeId,
    /// Node taken when the feature is absent
    pub no_node_id: NodeId,
}

/// One node line before references are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNodeRecord {
    /// Id of the node
    pub node_id: NodeId,
    /// Additive contribution of the node
    pub base_value: Score,
    /// Branches in line order
    pub branches: Vec<RawBranchRecord>,
}

/// Parses one node line. `line_no` is only used for error reporting.
pub fn parse_node_line(
    line: &str,
    line_no: usize,
) -> std::result::Result<RawNodeRecord, MalformedModelError> {
    let fail = |reason: String| MalformedModelError::parse(line_no, line, reason);

    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != 3 {
        return Err(fail(format!(
            "expected 3 tab-separated fields, found {}",
            fields.len()
        )));
    }

    let node_id = fields[0]
        .parse::<NodeId>()
        .map_err(|_| fail(format!("invalid node id '{}'", fields[0])))?;

    let base_value = fields[1]
        .parse::<Score>()
        .map_err(|_| fail(format!("invalid base value '{}'", fields[1])))?;

    let mut branches = Vec::new();
    if !fields[2].is_empty() {
        for branch_str in fields[2].split(BRANCH_SEPARATOR) {
            branches.push(parse_branch(branch_str).map_err(fail)?);
        }
    }

    Ok(RawNodeRecord {
        node_id,
        base_value,
        branches,
    })
}

fn parse_branch(branch_str: &str) -> std::result::Result<RawBranchRecord, String> {
    let parts: Vec<&str> = branch_str.split(BRANCH_FIELD_SEPARATOR).collect();
    if parts.len() != 3 {
        return Err(format!(
            "branch '{}' must have the form feature:yes_id:no_id",
            branch_str
        ));
    }

    let feature_id = parts[0]
        .parse::<FeatureId>()
        .map_err(|_| format!("invalid feature id '{}' in branch '{}'", parts[0], branch_str))?;
    let yes_node_id = parts[1]
        .parse::<NodeId>()
        .map_err(|_| format!("invalid yes node id '{}' in branch '{}'", parts[1], branch_str))?;
    let no_node_id = parts[2]
        .parse::<NodeId>()
        .map_err(|_| format!("invalid no node id '{}' in branch '{}'", parts[2], branch_str))?;

    Ok(RawBranchRecord {
        feature_id,
        yes_node_id,
        no_node_id,
    })
}

/// Builds forests from model text.
#[derive(Debug, Clone, Default)]
pub struct ForestLoader {
    reject_cycles: bool,
    check_header: bool,
}

impl ForestLoader {
    /// Loader with default behaviour: cycles accepted, header not checked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader honouring the load-related options of a configuration.
    pub fn from_config(config: &ForestConfig) -> Self {
        ForestLoader {
            reject_cycles: config.reject_cycles,
            check_header: config.check_header,
        }
    }

    /// Reject graphs containing a cycle.
    pub fn reject_cycles(mut self, reject: bool) -> Self {
        self.reject_cycles = reject;
        self
    }

    /// Warn when the header line differs from [`MODEL_HEADER`].
    pub fn check_header(mut self, check: bool) -> Self {
        self.check_header = check;
        self
    }

    /// Loads a forest from a buffered reader.
    pub fn load<R: BufRead>(&self, mut reader: R) -> Result<Forest> {
        let mut buf = Vec::new();

        // header
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(MalformedModelError::EmptyModel.into());
        }
        {
            let header = String::from_utf8_lossy(&buf);
            let header = header.trim_end_matches(['\r', '\n']);
            log::debug!("Model header: '{}'", header);
            if self.check_header && header != MODEL_HEADER {
                log::warn!(
                    "Unexpected model header '{}', expected '{}'",
                    header,
                    MODEL_HEADER
                );
            }
        }

        let mut records: Vec<(RawNodeRecord, usize)> = Vec::new();
        let mut slots: HashMap<NodeId, usize> = HashMap::new();
        let mut root_id: Option<NodeId> = None;
        let mut line_no = 1;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = decode_line(&buf, line_no)?;
            if line.is_empty() {
                break;
            }

            let record = parse_node_line(line, line_no)?;
            root_id.get_or_insert(record.node_id);

            match slots.get(&record.node_id) {
                Some(&slot) => {
                    log::warn!(
                        "Node {} redefined at line {} (first defined at line {}), keeping the later definition",
                        record.node_id,
                        line_no,
                        records[slot].1
                    );
                    records[slot] = (record, line_no);
                }
                None => {
                    slots.insert(record.node_id, records.len());
                    records.push((record, line_no));
                }
            }
        }

        let root_id = root_id.ok_or(MalformedModelError::EmptyModel)?;
        let forest = resolve(&records, &slots, root_id)?;

        if self.reject_cycles {
            if let Some(node_id) = forest.find_cycle() {
                return Err(MalformedModelError::CyclicReference { node_id }.into());
            }
        }

        let reachable = forest.reachable_from_root().len();
        if reachable < forest.len() {
            log::debug!(
                "{} of {} nodes are not reachable from root node {}",
                forest.len() - reachable,
                forest.len(),
                root_id
            );
        }

        log::info!(
            "Loaded forest: {} nodes, {} branches, root node {}",
            forest.len(),
            forest.num_branches(),
            root_id
        );

        Ok(forest)
    }

    /// Loads a forest from an in-memory string.
    pub fn load_str(&self, text: &str) -> Result<Forest> {
        self.load(text.as_bytes())
    }

    /// Loads a forest from a file.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<Forest> {
        let path = path.as_ref();
        log::debug!("Loading model from {}", path.display());
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }
}

/// Allocates every node, then wires every branch by id lookup.
fn resolve(
    records: &[(RawNodeRecord, usize)],
    slots: &HashMap<NodeId, usize>,
    root_id: NodeId,
) -> std::result::Result<Forest, MalformedModelError> {
    let mut nodes: Vec<ResolvedNode> = records
        .iter()
        .map(|(record, _)| ResolvedNode::new(record.node_id, record.base_value))
        .collect();

    let index: HashMap<NodeId, NodeIndex> = slots
        .iter()
        .map(|(&node_id, &slot)| (node_id, NodeIndex(slot)))
        .collect();

    for (slot, (record, line)) in records.iter().enumerate() {
        let lookup = |referenced_id: NodeId, side: BranchSide| {
            index
                .get(&referenced_id)
                .copied()
                .ok_or(MalformedModelError::DanglingReference {
                    node_id: record.node_id,
                    referenced_id,
                    side,
                    line: *line,
                })
        };

        nodes[slot].reserve_branches(record.branches.len());
        for raw in &record.branches {
            let yes_branch = lookup(raw.yes_node_id, BranchSide::Yes)?;
            let no_branch = lookup(raw.no_node_id, BranchSide::No)?;
            nodes[slot].push_branch(ResolvedBranch {
                feature_id: raw.feature_id,
                yes_branch,
                no_branch,
            });
        }
    }

    let root = index
        .get(&root_id)
        .copied()
        .ok_or(MalformedModelError::EmptyModel)?;
    Ok(Forest::from_parts(nodes, index, root))
}

/// Line text without its terminator; non-UTF-8 bytes are a parse error on that line.
fn decode_line(raw: &[u8], line_no: usize) -> std::result::Result<&str, MalformedModelError> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        MalformedModelError::parse(
            line_no,
            String::from_utf8_lossy(raw).trim_end_matches(['\r', '\n']),
            format!("invalid UTF-8 at byte {}", e.valid_up_to()),
        )
    })?;
    Ok(text.trim_end_matches(['\r', '\n']))
}

/// Loads a forest from a reader with default options.
pub fn load<R: BufRead>(reader: R) -> Result<Forest> {
    ForestLoader::new().load(reader)
}

/// Loads a forest from a string with default options.
pub fn load_str(text: &str) -> Result<Forest> {
    ForestLoader::new().load_str(text)
}

/// Loads a forest from a file with default options.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Forest> {
    ForestLoader::new().load_path(path)
}

/// Writes a forest in model text form.
///
/// Only nodes reachable from the root are written, each once, root first and
/// then in depth-first pre-order. Base values are written with
/// [`BASE_VALUE_PRECISION`] fractional digits.
pub fn write_forest<W: Write>(forest: &Forest, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", MODEL_HEADER)?;

    for idx in forest.reachable_from_root() {
        let node = forest.node(idx);
        write!(
            writer,
            "{}{}{:.*}{}",
            node.node_id(),
            FIELD_SEPARATOR,
            BASE_VALUE_PRECISION,
            node.base_value(),
            FIELD_SEPARATOR
        )?;

        for (i, branch) in node.branches().iter().enumerate() {
            if i > 0 {
                write!(writer, "{}", BRANCH_SEPARATOR)?;
            }
            write!(
                writer,
                "{}{sep}{}{sep}{}",
                branch.feature_id,
                forest.node(branch.yes_branch).node_id(),
                forest.node(branch.no_branch).node_id(),
                sep = BRANCH_FIELD_SEPARATOR
            )?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Writes a forest to a file, creating parent directories as needed.
pub fn save_path<P: AsRef<Path>>(forest: &Forest, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write_forest(forest, &mut writer)?;
    writer.flush()?;
    log::debug!("Saved forest with {} nodes to {}", forest.len(), path.display());
    Ok(())
}

impl Forest {
    /// Model text for this forest; see [`write_forest`].
    pub fn to_model_string(&self) -> String {
        let mut out = Vec::new();
        // writing into a Vec cannot fail
        let _ = write_forest(self, &mut out);
        String::from_utf8_lossy(&out).into_owned()
    }
}
