use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A parsed netlist file.
///
/// The first line holds `numcells numconn numrows numcols`, every following non-empty line
/// one net as `tag driver sink...`.
#[derive(Clone, Debug, Default)]
pub struct Netlist {
    pub num_cells: u32,
    pub num_connections: u32,
    pub num_rows: u32,
    pub num_cols: u32,
    pub nets: Vec<Vec<u32>>,
}

impl Netlist {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        Self::deserialize(BufReader::new(file))
            .with_context(|| format!("could not parse {}", path.display()))
    }

    pub fn deserialize<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, l)| l.map(|l| (i + 1, l)));

        // Parse the header line
        let (_, header) = lines.next().context("could not get header line")??;
        let header_parts = parse_integers(&header).context("could not parse header line")?;
        ensure!(
            header_parts.len() >= 4,
            "header line needs 4 fields (numcells numconn numrows numcols), got {}",
            header_parts.len()
        );

        let mut netlist = Netlist {
            num_cells: header_parts[0],
            num_connections: header_parts[1],
            num_rows: header_parts[2],
            num_cols: header_parts[3],
            nets: vec![],
        };

        // Parse the nets
        for line in lines {
            let (line_no, line) = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') || line.starts_with('#') {
                continue;
            }
            let net = parse_integers(line)
                .with_context(|| format!("could not parse net on line {line_no}"))?;

            if net.len() < 3 {
                log::warn!("net on line {line_no} has no driver/sink pair");
            }
            if let Some(cell) = net.iter().skip(1).find(|&&c| c >= netlist.num_cells) {
                log::warn!(
                    "net on line {line_no} references cell {cell}, but only {} cells are declared",
                    netlist.num_cells
                );
            }
            netlist.nets.push(net);
        }

        if netlist.nets.len() != netlist.num_connections as usize {
            log::warn!(
                "header declares {} nets, found {}",
                netlist.num_connections,
                netlist.nets.len()
            );
        }
        Ok(netlist)
    }
}

fn parse_integers(line: &str) -> Result<Vec<u32>> {
    line.split_ascii_whitespace()
        .map(|s| s.parse::<u32>().with_context(|| format!("invalid integer {s:?}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_nets() {
        let text = "4 3 2 3\n3 0 1 2\n\n2 1 3\n% comment\n2 3 2\n";
        let netlist = Netlist::deserialize(text.as_bytes()).unwrap();
        assert_eq!(netlist.num_cells, 4);
        assert_eq!(netlist.num_connections, 3);
        assert_eq!((netlist.num_rows, netlist.num_cols), (2, 3));
        assert_eq!(netlist.nets, vec![vec![3, 0, 1, 2], vec![2, 1, 3], vec![2, 3, 2]]);
    }

    #[test]
    fn tolerates_extra_whitespace() {
        let netlist = Netlist::deserialize("2 1 1 2 \n  2  0\t1  \n".as_bytes()).unwrap();
        assert_eq!(netlist.nets, vec![vec![2, 0, 1]]);
    }

    #[test]
    fn keeps_degenerate_nets() {
        let netlist = Netlist::deserialize("2 2 1 2\n1 0\n5\n".as_bytes()).unwrap();
        assert_eq!(netlist.nets, vec![vec![1, 0], vec![5]]);
    }

    #[test]
    fn keeps_nets_with_undeclared_cells() {
        let netlist = Netlist::deserialize("2 2 1 2\n2 0 1\n2 1 7\n".as_bytes()).unwrap();
        assert_eq!(netlist.num_cells, 2);
        assert_eq!(netlist.nets, vec![vec![2, 0, 1], vec![2, 1, 7]]);
    }

    #[test]
    fn net_count_may_differ_from_header() {
        let fewer = Netlist::deserialize("3 4 1 3\n2 0 1\n2 1 2\n".as_bytes()).unwrap();
        assert_eq!(fewer.num_connections, 4);
        assert_eq!(fewer.nets.len(), 2);

        let more = Netlist::deserialize("3 1 1 3\n2 0 1\n2 1 2\n".as_bytes()).unwrap();
        assert_eq!(more.num_connections, 1);
        assert_eq!(more.nets, vec![vec![2, 0, 1], vec![2, 1, 2]]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Netlist::deserialize("".as_bytes()).is_err());
        assert!(Netlist::deserialize("3 1 2\n".as_bytes()).is_err());

        let err = Netlist::deserialize("3 1 2 2\n2 0 x\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn open_reports_missing_files() {
        let err = Netlist::open("does/not/exist.txt").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.txt"));
    }
}
