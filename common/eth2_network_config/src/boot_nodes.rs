use std::fs::File;
use std::path::Path;

/// Entries with this extension are files holding a YAML list of addresses.
pub const BOOT_NODES_FILE_EXTENSION: &str = "yaml";

/// Expands `addrs` into a flat list of boot node addresses.
///
/// Each entry that names a `.yaml` file is replaced, in place, by the addresses listed in that
/// file. Every other entry is an address and is kept as-is.
pub fn load_boot_nodes<S: AsRef<str>>(addrs: &[S]) -> Result<Vec<String>, String> {
    let mut boot_nodes = Vec::with_capacity(addrs.len());

    for addr in addrs {
        let addr = addr.as_ref();
        let path = Path::new(addr);
        if path.extension().and_then(|ext| ext.to_str()) == Some(BOOT_NODES_FILE_EXTENSION) {
            boot_nodes.extend(read_boot_nodes_file(path)?);
        } else {
            boot_nodes.push(addr.to_string());
        }
    }

    Ok(boot_nodes)
}

/// Reads a YAML list of addresses from `path`.
pub fn read_boot_nodes_file(path: &Path) -> Result<Vec<String>, String> {
    let file = File::open(path)
        .map_err(|e| format!("Unable to open boot nodes file {}: {:?}", path.display(), e))?;
    serde_yaml::from_reader(file)
        .map_err(|e| format!("Unable to parse boot nodes file {}: {:?}", path.display(), e))
}

/// The boot nodes given on the command line, with any YAML files expanded.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct BootNodes(Vec<String>);

impl BootNodes {
    /// Parses a comma-separated flag value such as `enr:-abc,nodes.yaml`.
    ///
    /// Whitespace around entries is ignored, as are empty entries.
    pub fn from_cli_string(value: &str) -> Result<Self, String> {
        let addrs = value
            .split(',')
            .map(str::trim)
            .filter(|addr| !addr.is_empty())
            .collect::<Vec<_>>();

        load_boot_nodes(&addrs).map(BootNodes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for BootNodes {
    fn from(addrs: Vec<String>) -> Self {
        BootNodes(addrs)
    }
}
