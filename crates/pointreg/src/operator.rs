use std::fmt;

use log::info;

use crate::error::RegistrationError;
use crate::method::{align, Method};
use pointreg_3d::PointCloud;

/// A labelled, ordered collection of point clouds.
///
/// Stands in for the host application's cloud store: the registration
/// operator selects clouds out of it by selector strings and mutates the
/// moving ones in place.
#[derive(Debug, Clone, Default)]
pub struct CloudBank {
    clouds: Vec<(String, PointCloud)>,
}

impl CloudBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labelled cloud.
    pub fn push(&mut self, label: impl Into<String>, cloud: PointCloud) {
        self.clouds.push((label.into(), cloud));
    }

    /// Get the number of clouds in the bank.
    #[inline]
    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    /// Check if the bank is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    /// Get as reference the cloud at `index`.
    pub fn get(&self, index: usize) -> Option<&PointCloud> {
        self.clouds.get(index).map(|(_, cloud)| cloud)
    }

    /// Get as mutable reference the cloud at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut PointCloud> {
        self.clouds.get_mut(index).map(|(_, cloud)| cloud)
    }

    /// Get the label of the cloud at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.clouds.get(index).map(|(label, _)| label.as_str())
    }

    /// Iterate over `(label, cloud)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PointCloud)> {
        self.clouds
            .iter()
            .map(|(label, cloud)| (label.as_str(), cloud))
    }
}

/// A point cloud selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every cloud in the bank.
    All,
    /// The first cloud.
    First,
    /// The last cloud (the host default).
    Last,
    /// The cloud at a zero-based position.
    Index(usize),
    /// Every cloud whose label equals the string.
    Label(String),
}

impl Selection {
    /// Parse a selector string: `all`, `first`, `last`, `#<index>`, or a
    /// literal label.
    pub fn parse(selector: &str) -> Self {
        let trimmed = selector.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" => return Selection::All,
            "first" => return Selection::First,
            "last" => return Selection::Last,
            _ => {}
        }
        if let Some(index) = trimmed.strip_prefix('#') {
            if let Ok(index) = index.parse::<usize>() {
                return Selection::Index(index);
            }
        }
        Selection::Label(trimmed.to_string())
    }

    /// Resolve to the indices of the matching clouds, in bank order.
    fn resolve(&self, bank: &CloudBank) -> Vec<usize> {
        match self {
            Selection::All => (0..bank.len()).collect(),
            Selection::First => {
                if bank.is_empty() {
                    vec![]
                } else {
                    vec![0]
                }
            }
            Selection::Last => match bank.len() {
                0 => vec![],
                len => vec![len - 1],
            },
            Selection::Index(index) => {
                if *index < bank.len() {
                    vec![*index]
                } else {
                    vec![]
                }
            }
            Selection::Label(label) => (0..bank.len())
                .filter(|&i| bank.label(i) == Some(label.as_str()))
                .collect(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::First => write!(f, "first"),
            Selection::Last => write!(f, "last"),
            Selection::Index(index) => write!(f, "#{index}"),
            Selection::Label(label) => write!(f, "{label}"),
        }
    }
}

/// Align every selected moving cloud to the selected reference cloud.
///
/// The reference selector must resolve to exactly one cloud and the
/// moving selector to at least one, otherwise the call fails with
/// [`RegistrationError::InvalidSelection`]. Each moving cloud gets its
/// own transform computed against the reference and applied in place;
/// the reference is snapshotted first, so a cloud may serve as its own
/// reference. The bank itself is the caller's borrow and flows back out
/// of the call.
pub fn align_points(
    bank: &mut CloudBank,
    moving: &Selection,
    reference: &Selection,
    method: &Method,
) -> Result<(), RegistrationError> {
    let reference_indices = reference.resolve(bank);
    let reference_cloud = match reference_indices.as_slice() {
        [index] => match bank.get(*index) {
            Some(cloud) => cloud.clone(),
            None => {
                return Err(RegistrationError::InvalidSelection {
                    selector: reference.to_string(),
                    count: 0,
                })
            }
        },
        other => {
            return Err(RegistrationError::InvalidSelection {
                selector: reference.to_string(),
                count: other.len(),
            })
        }
    };

    let moving_indices = moving.resolve(bank);
    if moving_indices.is_empty() {
        return Err(RegistrationError::InvalidSelection {
            selector: moving.to_string(),
            count: 0,
        });
    }

    for index in moving_indices {
        let transform = match bank.get(index) {
            Some(cloud) => {
                info!(
                    "aligning {} points in cloud '{}' to the reference",
                    cloud.len(),
                    bank.label(index).unwrap_or("")
                );
                align(&reference_cloud, cloud, method)?
            }
            None => continue,
        };
        if let Some(cloud) = bank.get_mut(index) {
            transform.apply_in_place(cloud)?;
        }
    }

    Ok(())
}
