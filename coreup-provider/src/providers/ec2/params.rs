//! Flat query-parameter encoding.
//!
//! Every request is flattened into a [`ParameterSet`]: a sorted map of
//! `key -> value` strings. Lists use 1-based dotted indices (`InstanceId.1`,
//! `InstanceId.2`, ...); unset optional values produce no key at all.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::providers::common::url_encode;

use super::types::Tag;

// ============ ParameterSet ============

/// Query parameters of a single request, always iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    /// A parameter set carrying only `Action`.
    pub fn new(action: &str) -> Self {
        let mut params = Self::default();
        params.set("Action", action);
        params
    }

    /// Sets `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Sets `key` unless `value` is empty.
    pub fn set_if_not_empty(&mut self, key: impl Into<String>, value: &str) {
        if !value.is_empty() {
            self.set(key, value);
        }
    }

    /// Sets `key` when `value` is present and non-empty.
    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.set_if_not_empty(key, value);
        }
    }

    /// Sets `key` to `"true"` when `flag` is set.
    pub fn set_flag(&mut self, key: impl Into<String>, flag: bool) {
        if flag {
            self.set(key, "true");
        }
    }

    /// Sets `key` to the decimal value when it is positive.
    pub fn set_positive(&mut self, key: impl Into<String>, value: i64) {
        if value > 0 {
            self.set(key, value.to_string());
        }
    }

    /// Sets `key` to the decimal value unless it is zero. Negative values go
    /// out as written and the service rejects them.
    pub fn set_nonzero(&mut self, key: impl Into<String>, value: i64) {
        if value != 0 {
            self.set(key, value.to_string());
        }
    }

    /// Base64-encodes a binary payload into `key`.
    ///
    /// `None` adds nothing; an empty payload is sent as an empty value.
    pub fn set_base64(&mut self, key: impl Into<String>, data: Option<&[u8]>) {
        if let Some(data) = data {
            self.set(key, BASE64.encode(data));
        }
    }

    /// Adds `label.1 .. label.N` in the given order.
    pub fn add_list<S: AsRef<str>>(&mut self, label: &str, values: &[S]) {
        for (i, value) in values.iter().enumerate() {
            self.set(format!("{label}.{}", i + 1), value.as_ref());
        }
    }

    /// Adds `BlockDeviceMapping.<i>.*` keys, each sub-key omitted when unset.
    pub fn add_block_devices(&mut self, devices: &[BlockDeviceMapping]) {
        for (i, device) in devices.iter().enumerate() {
            let prefix = format!("BlockDeviceMapping.{}.", i + 1);
            self.set_if_not_empty(format!("{prefix}DeviceName"), &device.device_name);
            self.set_if_not_empty(format!("{prefix}VirtualName"), &device.virtual_name);
            self.set_if_not_empty(format!("{prefix}Ebs.SnapshotId"), &device.snapshot_id);
            self.set_if_not_empty(format!("{prefix}Ebs.VolumeType"), &device.volume_type);
            self.set_nonzero(format!("{prefix}Ebs.Iops"), device.iops);
            self.set_nonzero(format!("{prefix}Ebs.VolumeSize"), device.volume_size);
            self.set_flag(
                format!("{prefix}Ebs.DeleteOnTermination"),
                device.delete_on_termination,
            );
            self.set_flag(format!("{prefix}NoDevice"), device.no_device);
        }
    }

    /// Adds `Filter.<i>.Name` / `Filter.<i>.Value.<j>` in key order.
    pub fn add_filter(&mut self, filter: Option<&Filter>) {
        let Some(filter) = filter else {
            return;
        };
        for (i, (name, values)) in filter.0.iter().enumerate() {
            let prefix = format!("Filter.{}", i + 1);
            self.set(format!("{prefix}.Name"), name.as_str());
            self.add_list(&format!("{prefix}.Value"), values);
        }
    }

    /// Adds id references under `id_label.<i>` and name references under
    /// `name_label.<j>`, with independent counters.
    pub fn add_group_refs(&mut self, id_label: &str, name_label: &str, groups: &[GroupRef]) {
        let (mut i, mut j) = (1, 1);
        for group in groups {
            match group {
                GroupRef::Id(id) => {
                    self.set(format!("{id_label}.{i}"), id.as_str());
                    i += 1;
                }
                GroupRef::Name(name) => {
                    self.set(format!("{name_label}.{j}"), name.as_str());
                    j += 1;
                }
            }
        }
    }

    /// Adds only the id references under `label.<i>`; returns how many name references were skipped.
    pub fn add_group_ids(&mut self, label: &str, groups: &[GroupRef]) -> usize {
        let ids: Vec<&str> = groups.iter().filter_map(GroupRef::id).collect();
        self.add_list(label, &ids);
        groups.len() - ids.len()
    }

    /// Sets the single `GroupId` or `GroupName` key identifying one group.
    pub fn set_group(&mut self, group: &GroupRef) {
        match group {
            GroupRef::Id(id) => self.set("GroupId", id.as_str()),
            GroupRef::Name(name) => self.set("GroupName", name.as_str()),
        }
    }

    /// Adds `Tag.<i>.Key` / `Tag.<i>.Value`.
    pub fn add_tags(&mut self, tags: &[Tag]) {
        for (i, tag) in tags.iter().enumerate() {
            self.set(format!("Tag.{}.Key", i + 1), tag.key.as_str());
            self.set(format!("Tag.{}.Value", i + 1), tag.value.as_str());
        }
    }

    /// Value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Whether `key` is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `k=v` pairs in key order, both RFC 3986-encoded, joined with `&`.
    ///
    /// Used verbatim both as the signed canonical query and as the wire query string.
    pub fn canonical_query(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// ============ Filter ============

/// Named filters for `Describe*` actions.
///
/// Adding values to an existing name appends to it; names are emitted sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(BTreeMap<String, Vec<String>>);

impl Filter {
    /// An empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `values` to the filter `name`.
    pub fn add<I, S>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Whether no filter has been added.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============ Shared request pieces ============

/// Reference to a security group, either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupRef {
    /// `sg-...` id.
    Id(String),
    /// Group name (classic or default VPC).
    Name(String),
}

impl GroupRef {
    /// Reference by id.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id),
            Self::Name(_) => None,
        }
    }

    /// Convenience: references for a list of ids.
    pub fn ids<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Vec<Self> {
        ids.into_iter().map(|id| Self::Id(id.into())).collect()
    }

    /// Convenience: references for a list of names.
    pub fn names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Vec<Self> {
        names.into_iter().map(|name| Self::Name(name.into())).collect()
    }
}

/// Block device attached at launch or image creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDeviceMapping {
    pub device_name: String,
    pub virtual_name: String,
    pub snapshot_id: String,
    pub volume_type: String,
    /// GiB; 0 means unset.
    pub volume_size: i64,
    pub delete_on_termination: bool,
    pub no_device: bool,
    /// Provisioned IOPS; 0 means unset.
    pub iops: i64,
}
