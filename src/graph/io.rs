use super::*;
use itertools::Itertools;
use std::fs::{File, OpenOptions};
use std::io::{stdout, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub use dot::DotWrite;
pub use metis::{MetisRead, MetisWrite};
pub use pace::{PaceRead, PaceWrite};

/// Reasons why a graph or solution file could not be loaded. Loading never yields a partial
/// graph; the first problem aborts it.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read header")]
    MissingHeader,

    #[error("line {line}: invalid header: {reason}")]
    InvalidHeader { line: usize, reason: String },

    #[error("line {line}: cannot parse vertex '{token}'")]
    InvalidToken { line: usize, token: String },

    #[error("line {line}: vertex {vertex} is out of range 1..={order}")]
    InvalidVertex { line: usize, vertex: u64, order: usize },

    #[error("vertex {vertex} is out of range for a graph of order {order}")]
    VertexOutOfRange { vertex: u64, order: usize },

    #[error("line {line}: edge encountered before header")]
    EdgeBeforeHeader { line: usize },

    #[error("line {line}: expected two vertices per edge")]
    IncompleteEdge { line: usize },

    #[error("line {line}: more neighborhoods than nodes")]
    TooManyNeighborhoods { line: usize },
}

impl From<ReadError> for std::io::Error {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::Io(err) => err,
            err => std::io::Error::new(ErrorKind::InvalidData, err.to_string()),
        }
    }
}

/// Parses a 1-based vertex label and returns the 0-based node
fn parse_vertex(token: &str, order: usize, line: usize) -> Result<Node, ReadError> {
    let label = token.parse::<u64>().map_err(|_| ReadError::InvalidToken {
        line,
        token: token.to_string(),
    })?;

    if label == 0 || label > order as u64 {
        Err(ReadError::InvalidVertex {
            line,
            vertex: label,
            order,
        })
    } else {
        Ok((label - 1) as Node)
    }
}

pub mod dot {
    use super::*;

    pub trait DotWrite {
        /// produces a minimalistic DOT representation of the graph
        fn try_write_dot<T: Write>(&self, writer: T) -> Result<(), std::io::Error> {
            self.try_write_dot_with_solution(writer, std::iter::empty())
        }

        /// produces a DOT representation in which the nodes of `solution` are filled red
        fn try_write_dot_with_solution<T: Write, I: IntoIterator<Item = Node>>(
            &self,
            writer: T,
            solution: I,
        ) -> Result<(), std::io::Error>;
    }

    impl<G: AdjacencyList + SelfLoops> DotWrite for G {
        fn try_write_dot_with_solution<T: Write, I: IntoIterator<Item = Node>>(
            &self,
            mut writer: T,
            solution: I,
        ) -> Result<(), std::io::Error> {
            let n = self.number_of_nodes();
            let m = self.number_of_edges();
            write!(writer, "graph {{ /* n={} m={} */", n, m)?;

            for u in solution {
                write!(writer, " v{} [style=filled, fillcolor=red];", u)?;
            }

            for u in self.vertices() {
                if self.has_self_loop(u) {
                    write!(writer, " v{} -- v{};", u, u)?;
                }

                let larger = self.neighbors(u).iter().filter(|&&v| v > u).collect_vec();
                if larger.is_empty() {
                    continue;
                }

                write!(writer, " v{} -- {{", u)?;
                for v in larger {
                    write!(writer, " v{}", v)?;
                }
                write!(writer, " }};")?;
            }
            writeln!(writer, " }}")?;
            Ok(())
        }
    }
}

pub mod metis {
    use super::*;

    pub trait MetisRead: Sized {
        fn try_read_metis<T: BufRead>(buf: T) -> Result<Self, ReadError>;
    }

    pub trait MetisWrite {
        fn try_write_metis<T: Write>(&self, writer: T) -> Result<(), std::io::Error>;
    }

    impl<G: GraphFromEdges> MetisRead for G {
        fn try_read_metis<T: BufRead>(reader: T) -> Result<Self, ReadError> {
            let mut lines = reader
                .lines()
                .enumerate()
                .map(|(i, line)| (i + 1, line))
                .filter(|(_, line)| !matches!(line, Ok(line) if line.starts_with('%')));

            // parse header
            let n: usize = {
                let (line_no, header) = lines.next().ok_or(ReadError::MissingHeader)?;
                let header = header?;
                let invalid = |reason: &str| ReadError::InvalidHeader {
                    line: line_no,
                    reason: reason.to_string(),
                };

                let fields = header.split_whitespace().collect_vec();
                if fields.len() != 3 {
                    return Err(invalid("expected exactly 3 header fields"));
                }

                if fields[2].parse() != Ok(0) {
                    return Err(invalid("only unweighted graphs are supported"));
                }

                fields[0]
                    .parse()
                    .map_err(|_| invalid("cannot parse number of nodes"))?
            };

            // read neighbors
            let mut edges = Vec::new();
            let mut source = 0;
            for (line_no, neighbors) in lines {
                let neighbors = neighbors?;
                let neighbors = neighbors.trim();

                if source >= n {
                    if neighbors.is_empty() {
                        continue;
                    }
                    return Err(ReadError::TooManyNeighborhoods { line: line_no });
                }

                for token in neighbors.split_whitespace() {
                    edges.push((source as Node, parse_vertex(token, n, line_no)?));
                }

                source += 1;
            }

            G::try_from_edges(n, edges)
        }
    }

    impl<G: AdjacencyList + SelfLoops> MetisWrite for G {
        fn try_write_metis<T: Write>(&self, mut writer: T) -> Result<(), std::io::Error> {
            let loops = self.vertices().filter(|&u| self.has_self_loop(u)).count();
            writeln!(
                writer,
                "{} {} 0",
                self.number_of_nodes(),
                self.number_of_edges() + loops
            )?;
            for u in self.vertices() {
                let own = self.has_self_loop(u).then(|| u);
                let neigh_str = self
                    .neighbors(u)
                    .iter()
                    .copied()
                    .chain(own)
                    .map(|x| (x + 1).to_string())
                    .join(" ");
                writeln!(writer, "{}", neigh_str)?;
            }
            Ok(())
        }
    }
}

pub mod pace {
    use super::*;

    pub trait PaceRead: Sized {
        fn try_read_pace<T: BufRead>(buf: T) -> Result<Self, ReadError>;
    }

    pub trait PaceWrite {
        fn try_write_pace<T: Write>(&self, writer: T) -> Result<(), std::io::Error>;
    }

    impl<G: AdjacencyList + SelfLoops> PaceWrite for G {
        fn try_write_pace<T: Write>(&self, mut writer: T) -> Result<(), std::io::Error> {
            let loops = self.self_loops();
            let n = self.number_of_nodes();
            let m = self.number_of_edges() + loops.len();
            writeln!(writer, "p fvs {} {}", n, m)?;
            for u in loops {
                writeln!(writer, "{} {}", u + 1, u + 1)?;
            }
            for (u, v) in self.edges() {
                writeln!(writer, "{} {}", u + 1, v + 1)?;
            }
            Ok(())
        }
    }

    impl<G: GraphFromEdges> PaceRead for G {
        fn try_read_pace<T: BufRead>(reader: T) -> Result<Self, ReadError> {
            let mut order: Option<usize> = None;
            let mut edges = Vec::new();

            for (line_no, line) in reader.lines().enumerate() {
                let line_no = line_no + 1;
                let line = line?;
                let elements = line.split_whitespace().collect_vec();

                match elements.first() {
                    None | Some(&"c") => {
                        // who cares about comments..
                    }
                    Some(&"p") => {
                        order = Some(parse_order(&elements, line_no)?);
                    }
                    Some(_) => match order {
                        Some(n) => {
                            if elements.len() < 2 {
                                return Err(ReadError::IncompleteEdge { line: line_no });
                            }
                            let u = parse_vertex(elements[0], n, line_no)?;
                            let v = parse_vertex(elements[1], n, line_no)?;
                            edges.push((u, v));
                        }
                        None => return Err(ReadError::EdgeBeforeHeader { line: line_no }),
                    },
                };
            }

            match order {
                Some(n) => G::try_from_edges(n, edges),
                None => Err(ReadError::MissingHeader),
            }
        }
    }

    fn parse_order(elements: &[&str], line: usize) -> Result<usize, ReadError> {
        let invalid = |reason: &str| ReadError::InvalidHeader {
            line,
            reason: reason.to_string(),
        };

        if elements.len() < 3 {
            return Err(invalid("expected 'p <name> <nodes> <edges>'"));
        }

        elements[2]
            .parse::<usize>()
            .map_err(|_| invalid("cannot parse number of nodes"))
    }
}

/// Writes a deletion set, one 1-based vertex id per line in increasing order
pub fn write_solution<T: Write>(mut writer: T, solution: &[Node]) -> std::io::Result<()> {
    for u in solution.iter().sorted_unstable() {
        writeln!(writer, "{}", u + 1)?;
    }
    Ok(())
}

/// Parses a deletion set as written by [`write_solution`]; lines starting with `c` are comments.
/// Returns the 0-based nodes in increasing order.
pub fn read_solution<T: BufRead>(reader: T, order: usize) -> Result<Vec<Node>, ReadError> {
    let mut solution = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('c') {
            continue;
        }
        solution.push(parse_vertex(token, order, line_no + 1)?);
    }

    solution.sort_unstable();
    Ok(solution)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Dot,
    Metis,
    Pace,
}

impl FromStr for FileFormat {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(FileFormat::Dot),
            "metis" => Ok(FileFormat::Metis),
            "pace" => Ok(FileFormat::Pace),
            _ => Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("unknown type: {}", s),
            )),
        }
    }
}

pub trait GraphRead: Sized + PaceRead + MetisRead {
    /// Reads a graph in the given format from a buffered reader
    fn try_read_format<T: BufRead>(format: FileFormat, reader: T) -> std::io::Result<Self> {
        match format {
            FileFormat::Metis => Ok(Self::try_read_metis(reader)?),
            FileFormat::Pace => Ok(Self::try_read_pace(reader)?),
            FileFormat::Dot => Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                "Can't read dot files",
            )),
        }
    }

    /// Tries to read the graph file at the passed in path
    fn try_read_graph(format: FileFormat, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        Self::try_read_format(format, BufReader::new(file))
    }
}

impl<G: PaceRead + MetisRead> GraphRead for G {}

/// Intended for binaries to output a resulting graph
pub struct DefaultWriter {
    file: Option<File>,
    format: FileFormat,
}

impl DefaultWriter {
    /// If output is None, we will try to write to stdout, otherwise we will try to open the file
    pub fn from_path(output: Option<PathBuf>, format: Option<FileFormat>) -> std::io::Result<Self> {
        let detected_format = output.as_ref().and_then(|p| {
            p.extension().and_then(|ext| {
                ext.to_str()
                    .and_then(|ext_str| FileFormat::from_str(ext_str).ok())
            })
        });

        let used_format = match format.or(detected_format) {
            Some(f) => f,
            None if output.is_none() => FileFormat::Pace,
            None => {
                return Err(std::io::Error::new(
                    ErrorKind::Other,
                    "Either select the file format explicitly or use a path with extension (.dot|.pace|.metis)",
                ))
            }
        };

        let file = match output {
            Some(path) => Some(
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?,
            ),
            None => None,
        };

        Ok(Self {
            file,
            format: used_format,
        })
    }

    pub fn write<G: AdjacencyList + SelfLoops>(self, graph: &G) -> std::io::Result<()> {
        match self.file {
            None => Self::write_to(stdout().lock(), self.format, graph),
            Some(to) => Self::write_to(to, self.format, graph),
        }
    }

    fn write_to<W: Write, G: AdjacencyList + SelfLoops>(
        to: W,
        format: FileFormat,
        graph: &G,
    ) -> std::io::Result<()> {
        match format {
            FileFormat::Dot => graph.try_write_dot(to),
            FileFormat::Metis => graph.try_write_metis(to),
            FileFormat::Pace => graph.try_write_pace(to),
        }
    }
}
