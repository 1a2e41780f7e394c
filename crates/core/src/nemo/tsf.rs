//! Parser for the text listing produced by NEMO's `tsf` tool
//!
//! `tsf` prints a structured binary file as nested `set <Name>` … `tes`
//! blocks. Each data item is a header of the form
//! `<type> <Name>[d1][d2]… v1 v2 …`, whose values may continue on the
//! following lines. Without `allline=true`, long arrays are cut short with
//! a `. . .` marker; such arrays are detected as too short on extraction.
//!
//! ```text
//! set SnapShot
//!   set Parameters
//!     int Nobj 2
//!     double Time 0.500000
//!   tes
//!   set Particles
//!     double Mass[2] 0.500000 0.500000
//!     double Position[2][3] 1.0 0.0 0.0
//!       -1.0 0.0 0.0
//!   tes
//! tes
//! ```

use crate::core_types::Vec3;
use crate::nemo::{NemoError, NemoSnapshot};
use std::collections::HashMap;
use tracing::debug;

const NUMERIC_TYPES: [&str; 6] = ["byte", "short", "int", "long", "float", "double"];

/// One data item inside a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct TsfItem {
    /// Item type as printed (`int`, `double`, …)
    pub kind: String,
    /// Declared array dimensions; empty for scalars
    pub dims: Vec<usize>,
    /// Values in file order
    pub values: Vec<f64>,
}

/// Raw items of one `set SnapShot` block, keyed by item name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsfSnapshot {
    items: HashMap<String, TsfItem>,
}

impl TsfSnapshot {
    /// Item by name
    pub fn item(&self, name: &str) -> Option<&TsfItem> {
        self.items.get(name)
    }

    /// Whether the snapshot contains particle data
    pub fn has_particles(&self) -> bool {
        self.items.contains_key("Position") || self.items.contains_key("PhaseSpace")
    }

    fn scalar(&self, name: &'static str) -> Option<f64> {
        self.items.get(name).and_then(|item| item.values.first().copied())
    }

    fn array(&self, name: &'static str, expected: usize) -> Result<&[f64], NemoError> {
        let item = self
            .items
            .get(name)
            .ok_or(NemoError::MissingField { field: name })?;
        if item.values.len() < expected {
            return Err(NemoError::ArrayLength {
                field: name,
                expected,
                found: item.values.len(),
            });
        }
        Ok(&item.values[..expected])
    }

    /// Assemble particle arrays from the parsed items
    pub fn to_snapshot(&self) -> Result<NemoSnapshot, NemoError> {
        let count = self
            .scalar("Nobj")
            .ok_or(NemoError::MissingField { field: "Nobj" })?;
        if count < 0.0 || count.fract() != 0.0 {
            return Err(NemoError::InvalidValue {
                field: "Nobj",
                value: count,
            });
        }
        let n = count as usize;
        let time = self.scalar("Time");

        let masses = self.array("Mass", n)?.to_vec();

        let (positions, velocities) = if self.items.contains_key("PhaseSpace") {
            let values = self.array("PhaseSpace", n * 6)?;
            values
                .chunks_exact(6)
                .map(|w| (Vec3::new(w[0], w[1], w[2]), Vec3::new(w[3], w[4], w[5])))
                .unzip()
        } else {
            (
                to_vectors(self.array("Position", n * 3)?),
                to_vectors(self.array("Velocity", n * 3)?),
            )
        };

        Ok(NemoSnapshot {
            positions,
            velocities,
            masses,
            time,
            particle_count: n,
        })
    }
}

fn to_vectors(values: &[f64]) -> Vec<Vec3> {
    values
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect()
}

/// Split `Name[10][3]` into the name and its dimensions
fn split_dims(token: &str) -> (String, Vec<usize>) {
    match token.find('[') {
        Some(idx) => {
            let dims = token[idx..]
                .split(|c| c == '[' || c == ']')
                .filter_map(|d| d.parse().ok())
                .collect();
            (token[..idx].to_string(), dims)
        }
        None => (token.to_string(), Vec::new()),
    }
}

fn numbers<'a>(tokens: impl Iterator<Item = &'a str> + 'a) -> impl Iterator<Item = f64> + 'a {
    tokens.filter_map(|t| t.parse::<f64>().ok())
}

/// Item currently receiving continuation lines
enum Pending {
    None,
    Skip,
    Numeric(String, TsfItem),
}

struct Parser {
    stack: Vec<String>,
    current: Option<TsfSnapshot>,
    pending: Pending,
    snapshots: Vec<TsfSnapshot>,
}

impl Parser {
    fn flush_item(&mut self) {
        if let Pending::Numeric(name, item) = std::mem::replace(&mut self.pending, Pending::None) {
            if let Some(snapshot) = self.current.as_mut() {
                snapshot.items.insert(name, item);
            }
        }
    }

    fn line(&mut self, line: &str) {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return;
        };

        match first {
            "set" => {
                self.flush_item();
                let name = tokens.next().unwrap_or_default().to_string();
                if name == "SnapShot" {
                    self.current = Some(TsfSnapshot::default());
                }
                self.stack.push(name);
            }
            "tes" => {
                self.flush_item();
                if self.stack.pop().as_deref() == Some("SnapShot") {
                    if let Some(done) = self.current.take() {
                        self.snapshots.push(done);
                    }
                }
            }
            "char" => {
                self.flush_item();
                self.pending = Pending::Skip;
            }
            kind if NUMERIC_TYPES.contains(&kind) => {
                self.flush_item();
                let Some(header) = tokens.next() else {
                    return;
                };
                let (name, dims) = split_dims(header);
                let values = numbers(tokens).collect();
                self.pending = Pending::Numeric(
                    name,
                    TsfItem {
                        kind: kind.to_string(),
                        dims,
                        values,
                    },
                );
            }
            _ => {
                if let Pending::Numeric(_, item) = &mut self.pending {
                    item.values.extend(numbers(line.split_whitespace()));
                }
            }
        }
    }
}

/// Parse a complete `tsf` listing into its snapshots, in file order
pub fn parse_tsf(text: &str) -> Vec<TsfSnapshot> {
    let mut parser = Parser {
        stack: Vec::new(),
        current: None,
        pending: Pending::None,
        snapshots: Vec::new(),
    };
    for line in text.lines() {
        parser.line(line);
    }
    parser.flush_item();
    // an unterminated final snapshot still counts
    if let Some(open) = parser.current.take() {
        parser.snapshots.push(open);
    }
    debug!("Parsed {} snapshot(s) from tsf output", parser.snapshots.len());
    parser.snapshots
}

/// Parse a listing and extract particle data from snapshot `timestep`
pub fn parse_snapshot(text: &str, timestep: usize) -> Result<NemoSnapshot, NemoError> {
    let snapshots = parse_tsf(text);
    if snapshots.is_empty() {
        return Err(NemoError::NoSnapshots);
    }
    let available = snapshots.len();
    snapshots
        .get(timestep)
        .ok_or(NemoError::TimestepOutOfRange {
            timestep,
            available,
        })?
        .to_snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BODY: &str = "\
char Headline[22] \"two body test snapshot\"
char History[40] \"mkplummer out=- nbody=2 seed=1
  continued history\"
set SnapShot
  set Parameters
    int Nobj 2
    double Time 0.00000
  tes
  set Particles
    int CoordSystem 66306
    double Mass[2] 0.500000 0.500000
    double Position[2][3] 1.00000 0.00000 0.00000
      -1.00000 0.00000 0.00000
    double Velocity[2][3] 0.00000 0.500000 0.00000 0.00000
      -0.500000 0.00000
  tes
tes
set SnapShot
  set Parameters
    int Nobj 2
    double Time 0.500000
  tes
  set Particles
    double Mass[2] 0.500000 0.500000
    double Position[2][3]
      0.9 0.4 0.0 -0.9 -0.4 0.0
    double Velocity[2][3] -0.2 0.45 0.0 0.2 -0.45 0.0
  tes
tes
";

    #[test]
    fn test_parses_every_snapshot() {
        let snaps = parse_tsf(TWO_BODY);
        assert_eq!(snaps.len(), 2);
        assert!(snaps.iter().all(TsfSnapshot::has_particles));
        let mass = snaps[0].item("Mass").unwrap();
        assert_eq!(mass.kind, "double");
        assert_eq!(mass.dims, vec![2]);
        assert!(snaps[0].item("Headline").is_none());
    }

    #[test]
    fn test_extracts_arrays_across_continuation_lines() {
        let snap = parse_snapshot(TWO_BODY, 0).unwrap();
        assert_eq!(snap.particle_count, 2);
        assert_eq!(snap.time, Some(0.0));
        assert_eq!(snap.masses, vec![0.5, 0.5]);
        assert_eq!(snap.positions[1], Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(snap.velocities[1], Vec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_selects_later_timestep() {
        let snap = parse_snapshot(TWO_BODY, 1).unwrap();
        assert_eq!(snap.time, Some(0.5));
        assert_eq!(snap.positions[0], Vec3::new(0.9, 0.4, 0.0));
        assert_eq!(snap.velocities[1], Vec3::new(0.2, -0.45, 0.0));
    }

    #[test]
    fn test_timestep_out_of_range() {
        assert!(matches!(
            parse_snapshot(TWO_BODY, 2),
            Err(NemoError::TimestepOutOfRange {
                timestep: 2,
                available: 2
            })
        ));
    }

    #[test]
    fn test_phase_space_layout() {
        let text = "\
set SnapShot
  set Parameters
    int Nobj 2
  tes
  set Particles
    double Mass[2] 1.0 2.0
    double PhaseSpace[2][2][3] 1 2 3 4 5 6
      7 8 9 10 11 12
  tes
tes
";
        let snap = parse_snapshot(text, 0).unwrap();
        assert_eq!(snap.time, None);
        assert_eq!(snap.positions[1], Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(snap.velocities[0], Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_truncated_listing_is_reported() {
        let text = "\
set SnapShot
  set Parameters
    int Nobj 4
  tes
  set Particles
    double Mass[4] 0.25 0.25 . . .
    double Position[4][3] 0 0 0 1 1 1 . . .
  tes
tes
";
        assert!(matches!(
            parse_snapshot(text, 0),
            Err(NemoError::ArrayLength {
                field: "Mass",
                expected: 4,
                found: 2
            })
        ));
    }

    #[test]
    fn test_missing_particle_count() {
        let text = "set SnapShot\n  set Particles\n    double Mass[1] 1.0\n  tes\ntes\n";
        assert!(matches!(
            parse_snapshot(text, 0),
            Err(NemoError::MissingField { field: "Nobj" })
        ));
    }

    #[test]
    fn test_empty_listing() {
        assert!(matches!(parse_snapshot("", 0), Err(NemoError::NoSnapshots)));
    }

    #[test]
    fn test_split_dims() {
        assert_eq!(split_dims("PhaseSpace[10][2][3]"), ("PhaseSpace".to_string(), vec![10, 2, 3]));
        assert_eq!(split_dims("Nobj"), ("Nobj".to_string(), vec![]));
    }
}
