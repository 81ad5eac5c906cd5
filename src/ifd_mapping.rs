use crate::error::{Error, Result};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Separator between the names of a full ifd path, e.g. `IFD/Exif/Iop`.
pub const PATH_SEPARATOR: &str = "/";

pub const IFD_PATH_STANDARD: &str = "IFD";
pub const IFD_PATH_EXIF: &str = "IFD/Exif";
pub const IFD_PATH_GPS: &str = "IFD/GPSInfo";
pub const IFD_PATH_IOP: &str = "IFD/Exif/Iop";
pub const IFD_PATH_THUMBNAIL: &str = "IFD1";

/// The tags that point from a parent IFD to its standard children.
pub const EXIF_IFD_POINTER: u16 = 0x8769;
pub const GPS_IFD_POINTER: u16 = 0x8825;
pub const IOP_IFD_POINTER: u16 = 0xa005;

/// One row of the seed table a mapping is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdSeed {
    /// The full path of the parent, `None` for a root.
    pub parent: Option<&'static str>,
    pub name: &'static str,
    /// The tag in the parent that points to this IFD (roots have none).
    pub tag_id: Option<u16>,
    pub aliases: &'static [&'static str],
}

pub const STANDARD_IFDS: [IfdSeed; 8] = [
    IfdSeed {
        parent: None,
        name: "IFD",
        tag_id: None,
        aliases: &["IFD0"],
    },
    IfdSeed {
        parent: Some("IFD"),
        name: "Exif",
        tag_id: Some(EXIF_IFD_POINTER),
        aliases: &[],
    },
    IfdSeed {
        parent: Some("IFD"),
        name: "GPSInfo",
        tag_id: Some(GPS_IFD_POINTER),
        aliases: &["GPS"],
    },
    IfdSeed {
        parent: Some("IFD/Exif"),
        name: "Iop",
        tag_id: Some(IOP_IFD_POINTER),
        aliases: &["Interoperability"],
    },
    // the second top-level IFD of an exif block holds the thumbnail
    IfdSeed {
        parent: None,
        name: "IFD1",
        tag_id: None,
        aliases: &[],
    },
    IfdSeed {
        parent: Some("IFD1"),
        name: "Exif",
        tag_id: Some(EXIF_IFD_POINTER),
        aliases: &[],
    },
    IfdSeed {
        parent: Some("IFD1"),
        name: "GPSInfo",
        tag_id: Some(GPS_IFD_POINTER),
        aliases: &["GPS"],
    },
    IfdSeed {
        parent: Some("IFD1/Exif"),
        name: "Iop",
        tag_id: Some(IOP_IFD_POINTER),
        aliases: &["Interoperability"],
    },
];

/// Identifies a directory within one [IfdMapping]. Cheap to copy and compare.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IfdPathId(u32);

impl IfdPathId {
    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Debug for IfdPathId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "IfdPathId({})", self.0)
    }
}

/// A directory known to an [IfdMapping].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedIfd {
    pub id: IfdPathId,
    pub name: String,
    pub parent: Option<IfdPathId>,
    pub tag_id: Option<u16>,
    pub aliases: Vec<String>,
    children: BTreeMap<String, IfdPathId>,
}

impl MappedIfd {
    pub fn children(&self) -> impl Iterator<Item = IfdPathId> + '_ {
        self.children.values().copied()
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|alias| alias == name)
    }
}

/// The tree of ifd paths: roots (`IFD`, `IFD1`) and the sub-IFDs reachable from them.
///
/// Nodes live in an arena and are referenced by [IfdPathId]. Extending a mapping needs `&mut`;
/// to extend a shared one, clone it and extend the copy.
#[derive(Debug, Clone, Default)]
pub struct IfdMapping {
    nodes: Vec<MappedIfd>,
    roots: BTreeMap<String, IfdPathId>,
}

impl IfdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapping of the standard EXIF layout.
    pub fn with_standard() -> Result<Self> {
        Self::from_seed(&STANDARD_IFDS)
    }

    /// Builds a mapping from seed rows. Parents must come before their children.
    pub fn from_seed(seed: &[IfdSeed]) -> Result<Self> {
        let mut mapping = Self::new();
        for row in seed {
            let parent = match row.parent {
                Some(path) => Some(mapping.resolve_path(path).map_err(|_| {
                    Error::InternalConsistency(format!(
                        "parent '{path}' of '{}' is not registered before it",
                        row.name
                    ))
                })?),
                None => None,
            };
            let id = mapping.add(parent, row.name, row.tag_id)?;
            for alias in row.aliases {
                mapping.alias(id, alias)?;
            }
        }
        log::debug!(
            "built ifd mapping with {} paths ({} roots)",
            mapping.len(),
            mapping.roots.len()
        );
        Ok(mapping)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: IfdPathId) -> Result<&MappedIfd> {
        self.nodes.get(id.index()).ok_or(Error::UnknownPathId(id))
    }

    fn siblings(&self, parent: Option<IfdPathId>) -> Result<Vec<&MappedIfd>> {
        let ids: Vec<IfdPathId> = match parent {
            Some(parent) => self.get(parent)?.children().collect(),
            None => self.roots.values().copied().collect(),
        };
        Ok(ids.into_iter().map(|id| &self.nodes[id.index()]).collect())
    }

    /// Registers a new directory under `parent` (or as a root).
    ///
    /// `tag_id` is the tag of the parent that points to the new directory.
    pub fn add(
        &mut self,
        parent: Option<IfdPathId>,
        name: &str,
        tag_id: Option<u16>,
    ) -> Result<IfdPathId> {
        let siblings = self.siblings(parent)?;
        let duplicate = siblings.iter().any(|sibling| {
            sibling.answers_to(name) || (tag_id.is_some() && sibling.tag_id == tag_id)
        });
        if duplicate {
            return Err(Error::DuplicatePath {
                parent: self.parent_string(parent),
                name: name.to_string(),
            });
        }

        let id = IfdPathId(self.nodes.len() as u32);
        self.nodes.push(MappedIfd {
            id,
            name: name.to_string(),
            parent,
            tag_id,
            aliases: Vec::new(),
            children: BTreeMap::new(),
        });
        match parent {
            Some(parent) => {
                self.nodes[parent.index()]
                    .children
                    .insert(name.to_string(), id);
            }
            None => {
                self.roots.insert(name.to_string(), id);
            }
        }
        Ok(id)
    }

    /// Makes `id` reachable under an alternative name as well.
    pub fn alias(&mut self, id: IfdPathId, alternate_name: &str) -> Result<()> {
        let parent = self.get(id)?.parent;
        if self
            .siblings(parent)?
            .iter()
            .any(|sibling| sibling.answers_to(alternate_name))
        {
            return Err(Error::DuplicatePath {
                parent: self.parent_string(parent),
                name: alternate_name.to_string(),
            });
        }
        self.nodes[id.index()]
            .aliases
            .push(alternate_name.to_string());
        Ok(())
    }

    fn parent_string(&self, parent: Option<IfdPathId>) -> String {
        parent
            .map(|parent| self.path_string(parent))
            .unwrap_or_default()
    }

    fn find(&self, parent: Option<IfdPathId>, name: &str) -> Option<IfdPathId> {
        let direct = match parent {
            Some(parent) => self.nodes.get(parent.index())?.children.get(name),
            None => self.roots.get(name),
        };
        if let Some(id) = direct {
            return Some(*id);
        }
        self.siblings(parent)
            .ok()?
            .into_iter()
            .find(|node| node.answers_to(name))
            .map(|node| node.id)
    }

    /// Looks up the child called `name` (or aliased so) of `parent`.
    pub fn child(&self, parent: IfdPathId, name: &str) -> Result<IfdPathId> {
        self.get(parent)?;
        self.find(Some(parent), name).ok_or_else(|| {
            Error::UnknownPath(format!("{}{PATH_SEPARATOR}{name}", self.path_string(parent)))
        })
    }

    /// Looks up the child of `parent` that the tag `tag_id` points to.
    pub fn child_by_tag(&self, parent: IfdPathId, tag_id: u16) -> Result<IfdPathId> {
        self.get(parent)?
            .children()
            .find(|child| self.nodes[child.index()].tag_id == Some(tag_id))
            .ok_or_else(|| {
                Error::UnknownPath(format!(
                    "{}{PATH_SEPARATOR}{tag_id:#06x}",
                    self.path_string(parent)
                ))
            })
    }

    /// Resolves a sequence of names, starting at a root.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<IfdPathId> {
        let unknown = || {
            Error::UnknownPath(
                names
                    .iter()
                    .map(|name| AsRef::<str>::as_ref(name))
                    .join(PATH_SEPARATOR),
            )
        };
        let mut current = None;
        for name in names {
            current = Some(
                self.find(current, AsRef::<str>::as_ref(name))
                    .ok_or_else(unknown)?,
            );
        }
        current.ok_or_else(unknown)
    }

    /// Resolves a full path like `IFD/Exif`.
    pub fn resolve_path(&self, path: &str) -> Result<IfdPathId> {
        let names: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        self.resolve(&names)
    }

    pub fn parent(&self, id: IfdPathId) -> Result<Option<IfdPathId>> {
        Ok(self.get(id)?.parent)
    }

    pub fn children(&self, id: IfdPathId) -> Result<Vec<IfdPathId>> {
        Ok(self.get(id)?.children().collect())
    }

    pub fn roots(&self) -> impl Iterator<Item = IfdPathId> + '_ {
        self.roots.values().copied()
    }

    /// The ids from the root down to (and including) `id`.
    pub fn lineage(&self, id: IfdPathId) -> Result<Vec<IfdPathId>> {
        let mut lineage = vec![id];
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent {
            lineage.push(parent);
            current = self.get(parent)?;
        }
        lineage.reverse();
        Ok(lineage)
    }

    /// The canonical full path of `id`, e.g. `IFD/Exif/Iop`. Unknown ids render empty.
    pub fn path_string(&self, id: IfdPathId) -> String {
        self.lineage(id)
            .map(|lineage| {
                lineage
                    .iter()
                    .map(|id| self.nodes[id.index()].name.as_str())
                    .join(PATH_SEPARATOR)
            })
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappedIfd> {
        self.nodes.iter()
    }
}
