use crate::error::{Error, Result};
use crate::ifd_mapping::{IfdMapping, IfdPathId};
use crate::tag_type::TagType;
use crate::tags::{TagCount, TagDescriptor, TagInterpretation, TagTable, STANDARD_TAG_TABLES};
use std::collections::HashMap;

/// Everything the index knows about one tag within one ifd path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub path: IfdPathId,
    pub descriptor: TagDescriptor,
}

impl TagInfo {
    pub fn id(&self) -> u16 {
        self.descriptor.tag
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// The types a writer may use; the first one is preferred.
    pub fn tag_types(&self) -> &'static [TagType] {
        self.descriptor.dtype
    }

    pub fn count(&self) -> TagCount {
        self.descriptor.count
    }

    pub fn description(&self) -> &'static str {
        self.descriptor.description
    }

    pub fn interpretation(&self) -> TagInterpretation {
        self.descriptor.interpretation
    }

    pub fn is(&self, path: IfdPathId, id: u16) -> bool {
        self.path == path && self.id() == id
    }

    pub fn is_name(&self, path: IfdPathId, name: &str) -> bool {
        self.path == path && self.name() == name
    }

    pub fn supports_type(&self, tag_type: TagType) -> bool {
        self.tag_types().contains(&tag_type)
    }
}

/// Tag metadata, looked up by (ifd path, tag id) or (ifd path, tag name).
///
/// Both lookups share one set of records. An index is immutable once built, so it can be shared
/// between threads freely.
#[derive(Debug, Clone)]
pub struct TagIndex {
    mapping: IfdMapping,
    records: Vec<TagInfo>,
    by_id: HashMap<(IfdPathId, u16), usize>,
    by_name: HashMap<(IfdPathId, &'static str), usize>,
}

impl TagIndex {
    /// Indexes the standard tag tables against `mapping`.
    pub fn with_standard(mapping: &IfdMapping) -> Result<Self> {
        Self::new(mapping, &STANDARD_TAG_TABLES)
    }

    /// Indexes `tables`, every path of which must be known to `mapping`.
    ///
    /// Contradicting seed data (an unknown path, a duplicate id or name within one path, a pointer
    /// to a sub-IFD the mapping doesn't have) is reported as [Error::InternalConsistency].
    pub fn new(mapping: &IfdMapping, tables: &[TagTable]) -> Result<Self> {
        let mut index = Self {
            mapping: mapping.clone(),
            records: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        };
        for table in tables {
            let path = mapping.resolve_path(table.path).map_err(|_| {
                Error::InternalConsistency(format!(
                    "tag table references unknown ifd path '{}'",
                    table.path
                ))
            })?;
            for descriptor in table.tags {
                index.insert(path, table.path, *descriptor)?;
            }
        }
        log::debug!(
            "built tag index with {} tags in {} tables",
            index.len(),
            tables.len()
        );
        Ok(index)
    }

    fn insert(
        &mut self,
        path: IfdPathId,
        path_name: &str,
        descriptor: TagDescriptor,
    ) -> Result<()> {
        if let TagInterpretation::IfdPointer { child } = descriptor.interpretation {
            let points_back = self
                .mapping
                .child(path, child)
                .and_then(|target| self.mapping.get(target))
                .map(|target| target.tag_id == Some(descriptor.tag))
                .unwrap_or(false);
            if !points_back {
                return Err(Error::InternalConsistency(format!(
                    "{descriptor} in '{path_name}' points to '{child}', \
                     which isn't mapped to that tag"
                )));
            }
        }
        if self.by_id.contains_key(&(path, descriptor.tag)) {
            return Err(Error::InternalConsistency(format!(
                "duplicate tag id {:#06x} in '{path_name}'",
                descriptor.tag
            )));
        }
        if self.by_name.contains_key(&(path, descriptor.name)) {
            return Err(Error::InternalConsistency(format!(
                "duplicate tag name '{}' in '{path_name}'",
                descriptor.name
            )));
        }

        let position = self.records.len();
        self.records.push(TagInfo { path, descriptor });
        self.by_id.insert((path, descriptor.tag), position);
        self.by_name.insert((path, descriptor.name), position);
        Ok(())
    }

    /// The mapping the index resolves paths with.
    pub fn mapping(&self) -> &IfdMapping {
        &self.mapping
    }

    /// Looks up a tag by id. `path` is a full ifd path like `IFD/Exif`.
    pub fn get(&self, path: &str, id: u16) -> Result<&TagInfo> {
        let path_id = self.mapping.resolve_path(path)?;
        self.get_by_path_id(path_id, id)
    }

    /// Looks up a tag by its (case sensitive) name.
    pub fn get_with_name(&self, path: &str, name: &str) -> Result<&TagInfo> {
        let path_id = self.mapping.resolve_path(path)?;
        self.get_with_name_by_path_id(path_id, name)
    }

    pub fn get_by_path_id(&self, path: IfdPathId, id: u16) -> Result<&TagInfo> {
        match self.by_id.get(&(path, id)) {
            Some(&position) => Ok(&self.records[position]),
            None => {
                let path = self.mapping.path_string(path);
                log::trace!("no tag {id:#06x} in '{path}'");
                Err(Error::TagNotFound { path, id })
            }
        }
    }

    pub fn get_with_name_by_path_id(&self, path: IfdPathId, name: &str) -> Result<&TagInfo> {
        match self.by_name.get(&(path, name)) {
            Some(&position) => Ok(&self.records[position]),
            None => {
                let path = self.mapping.path_string(path);
                log::trace!("no tag named '{name}' in '{path}'");
                Err(Error::TagNameNotFound {
                    path,
                    name: name.to_string(),
                })
            }
        }
    }

    /// All tags registered for `path`, in table order.
    pub fn tags_in(&self, path: &str) -> Result<impl Iterator<Item = &TagInfo>> {
        let path_id = self.mapping.resolve_path(path)?;
        Ok(self.records.iter().filter(move |info| info.path == path_id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ifd_mapping::{IFD_PATH_EXIF, IFD_PATH_GPS, IFD_PATH_IOP, IFD_PATH_STANDARD};
    use crate::tags::{exif, ifd};

    fn standard() -> TagIndex {
        let mapping = IfdMapping::with_standard().unwrap();
        TagIndex::with_standard(&mapping).unwrap()
    }

    #[test]
    fn get() {
        let index = standard();
        let info = index.get(IFD_PATH_STANDARD, 0x10f).unwrap();
        assert_eq!(info.id(), 0x10f);
        assert_eq!(info.name(), "Make");
        assert_eq!(info.tag_types(), &[TagType::Ascii]);
        assert_eq!(
            index.mapping().path_string(info.path),
            IFD_PATH_STANDARD
        );
    }

    #[test]
    fn get_with_name() {
        let index = standard();
        let info = index.get_with_name(IFD_PATH_STANDARD, "Make").unwrap();
        assert_eq!(info.id(), 0x10f);
        assert_eq!(info, index.get(IFD_PATH_STANDARD, 0x10f).unwrap());
        assert_eq!(info.descriptor, ifd::Make);
    }

    #[test]
    fn lookups_agree() {
        let index = standard();
        for path in [IFD_PATH_STANDARD, IFD_PATH_EXIF, IFD_PATH_GPS, IFD_PATH_IOP, "IFD1"] {
            for info in index.tags_in(path).unwrap() {
                let by_name = index.get_with_name(path, info.name()).unwrap();
                let by_id = index.get(path, info.id()).unwrap();
                assert_eq!(by_name, by_id);
                assert!(by_id.is(info.path, info.id()));
                assert!(by_id.is_name(info.path, info.name()));
            }
        }
    }

    #[test]
    fn ids_are_scoped_by_path() {
        let index = standard();
        assert_eq!(index.get(IFD_PATH_GPS, 0x1).unwrap().name(), "GPSLatitudeRef");
        assert_eq!(
            index.get(IFD_PATH_IOP, 0x1).unwrap().name(),
            "InteroperabilityIndex"
        );
        assert!(index.get(IFD_PATH_STANDARD, 0x1).is_err());
        assert_eq!(index.get(IFD_PATH_EXIF, 0x829a).unwrap().descriptor, exif::ExposureTime);
        assert!(index.get(IFD_PATH_STANDARD, 0x829a).is_err());
    }

    #[test]
    fn thumbnail_ifd_shares_ifd_tags() {
        let index = standard();
        let thumbnail = index.get("IFD1", 0x10f).unwrap();
        let primary = index.get(IFD_PATH_STANDARD, 0x10f).unwrap();
        assert_eq!(thumbnail.descriptor, primary.descriptor);
        assert_ne!(thumbnail.path, primary.path);
    }

    #[test]
    fn every_standard_path_has_tags() {
        let mapping = IfdMapping::with_standard().unwrap();
        let index = TagIndex::with_standard(&mapping).unwrap();
        for ifd in mapping.iter() {
            let path = mapping.path_string(ifd.id);
            assert!(index.tags_in(&path).unwrap().next().is_some(), "{path}");
        }
    }

    #[test]
    fn thumbnail_sub_ifds_have_their_tags() {
        let index = standard();
        let exposure = index.get("IFD1/Exif", 0x829a).unwrap();
        assert_eq!(exposure.descriptor, exif::ExposureTime);
        assert_eq!(index.mapping().path_string(exposure.path), "IFD1/Exif");
        assert_eq!(index.get("IFD1/GPSInfo", 0x1).unwrap().name(), "GPSLatitudeRef");
        assert_eq!(
            index.get("IFD1/Exif/Iop", 0x1).unwrap().name(),
            "InteroperabilityIndex"
        );
    }

    #[test]
    fn aliases_reach_the_same_records() {
        let index = standard();
        assert_eq!(
            index.get("IFD0", 0x10f).unwrap(),
            index.get(IFD_PATH_STANDARD, 0x10f).unwrap()
        );
    }

    #[test]
    fn not_found() {
        let index = standard();
        let err = index.get(IFD_PATH_STANDARD, 0xfffe).unwrap_err();
        assert_eq!(
            err,
            Error::TagNotFound {
                path: IFD_PATH_STANDARD.to_string(),
                id: 0xfffe
            }
        );
        assert!(err.is_not_found());

        // names are case sensitive
        let err = index.get_with_name(IFD_PATH_STANDARD, "make").unwrap_err();
        assert!(matches!(err, Error::TagNameNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = index.get("IFD/Nope", 0x10f).unwrap_err();
        assert_eq!(err, Error::UnknownPath("IFD/Nope".to_string()));
        assert!(index.tags_in("IFD7").is_err());
    }

    #[test]
    fn tag_info_details() {
        let index = standard();
        let width = index.get_with_name(IFD_PATH_STANDARD, "ImageWidth").unwrap();
        assert!(width.supports_type(TagType::Short));
        assert!(width.supports_type(TagType::Long));
        assert!(!width.supports_type(TagType::Rational));
        assert_eq!(width.count(), TagCount::ConcreteValue(1));
        assert!(!width.description().is_empty());

        let exif_pointer = index.get(IFD_PATH_STANDARD, 0x8769).unwrap();
        assert_eq!(
            exif_pointer.interpretation(),
            TagInterpretation::IfdPointer { child: "Exif" }
        );
    }

    #[test]
    fn sizes() {
        let index = standard();
        assert_eq!(
            index.len(),
            STANDARD_TAG_TABLES.iter().map(|t| t.tags.len()).sum::<usize>()
        );
        assert_eq!(
            index.tags_in(IFD_PATH_EXIF).unwrap().count(),
            exif::ALL.len()
        );
    }

    const BROKEN_TAGS: [TagDescriptor; 2] = [ifd::Make, ifd::Make];

    #[test]
    fn inconsistent_seed_data() {
        let mapping = IfdMapping::with_standard().unwrap();

        let unknown_path = [TagTable {
            path: "IFD/MakerNote",
            tags: &ifd::ALL,
        }];
        let err = TagIndex::new(&mapping, &unknown_path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalConsistency);

        let duplicates = [TagTable {
            path: IFD_PATH_STANDARD,
            tags: &BROKEN_TAGS,
        }];
        let err = TagIndex::new(&mapping, &duplicates).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalConsistency);

        // the Exif pointer makes no sense within the GPS IFD
        let misplaced_pointer = [TagTable {
            path: IFD_PATH_GPS,
            tags: &ifd::ALL,
        }];
        let err = TagIndex::new(&mapping, &misplaced_pointer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalConsistency);
    }

    #[test]
    fn shared_between_threads() {
        let index = std::sync::Arc::new(standard());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = index.clone();
                std::thread::spawn(move || index.get(IFD_PATH_STANDARD, 0x10f).unwrap().name())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Make");
        }
    }
}
