//! Port-to-process lookup through procfs.
//!
//! The lookup walks three steps:
//! 1. `net/tcp` and `net/tcp6` give the socket inode bound to a local port.
//! 2. `<pid>/fd/*` links of the form `socket:[inode]` give the owning pid.
//! 3. `<pid>/comm` gives the process name.
//!
//! Processes whose fd directory cannot be read are skipped, so an
//! unprivileged gateway only sees callers running as its own user.

use crate::ports::{ResolveError, SenderResolver};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

const DEFAULT_PROC_ROOT: &str = "/proc";
const TCP_TABLES: [&str; 2] = ["net/tcp", "net/tcp6"];

/// Column of the local `address:port` in a procfs TCP table row.
const LOCAL_ADDRESS_COLUMN: usize = 1;
/// Column of the socket inode in a procfs TCP table row.
const INODE_COLUMN: usize = 9;

#[derive(Debug, Clone)]
pub struct ProcPortResolver {
    proc_root: PathBuf,
}

impl Default for ProcPortResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcPortResolver {
    pub fn new() -> Self {
        Self::with_root(DEFAULT_PROC_ROOT)
    }

    /// Resolve against a procfs mounted (or mocked) somewhere else.
    pub fn with_root(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    fn socket_inode(&self, port: u16) -> io::Result<Option<u64>> {
        for table in TCP_TABLES {
            let contents = match fs::read_to_string(self.proc_root.join(table)) {
                Ok(contents) => contents,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            if let Some(inode) = find_inode(&contents, port) {
                return Ok(Some(inode));
            }
        }
        Ok(None)
    }

    fn socket_owner(&self, inode: u64) -> io::Result<Option<u32>> {
        let wanted = format!("socket:[{inode}]");

        for entry in fs::read_dir(&self.proc_root)? {
            let entry = entry?;
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
                continue;
            };

            // Processes exit mid-scan and foreign fd dirs are unreadable.
            let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
                continue;
            };

            for fd in fds.flatten() {
                if let Ok(target) = fs::read_link(fd.path()) {
                    if target.as_os_str() == wanted.as_str() {
                        return Ok(Some(pid));
                    }
                }
            }
        }
        Ok(None)
    }

    fn process_name(&self, pid: u32) -> io::Result<String> {
        let comm = fs::read_to_string(self.proc_root.join(pid.to_string()).join("comm"))?;
        Ok(comm.trim_end().to_string())
    }
}

impl SenderResolver for ProcPortResolver {
    fn name_by_port(&self, port: u16) -> Result<String, ResolveError> {
        let inode = self
            .socket_inode(port)?
            .ok_or(ResolveError::NotFound(port))?;
        trace!(port, inode, "Found socket inode");

        let pid = self
            .socket_owner(inode)?
            .ok_or(ResolveError::NotFound(port))?;

        let name = self.process_name(pid)?;
        if name.is_empty() {
            return Err(ResolveError::NotFound(port));
        }

        debug!(port, pid, name = %name, "Resolved port owner");
        Ok(name)
    }
}

/// Find the inode of the first socket whose local port is `port`.
fn find_inode(table: &str, port: u16) -> Option<u64> {
    table.lines().skip(1).find_map(|line| {
        let columns: Vec<&str> = line.split_whitespace().collect();
        let local = columns.get(LOCAL_ADDRESS_COLUMN)?;
        let (_, hex_port) = local.rsplit_once(':')?;
        if u16::from_str_radix(hex_port, 16).ok()? != port {
            return None;
        }
        columns.get(INODE_COLUMN)?.parse::<u64>().ok().filter(|inode| *inode != 0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCP_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";

    fn tcp_row(local_port: u16, inode: u64) -> String {
        format!(
            "   0: 0100007F:{local_port:04X} 0100007F:DAC1 01 00000000:00000000 00:00000000 00000000  1000        0 {inode} 1 0000000000000000 20 4 30 10 -1\n"
        )
    }

    #[test]
    fn test_find_inode() {
        let table = format!("{TCP_HEADER}{}{}", tcp_row(56001, 1111), tcp_row(41000, 2222));

        assert_eq!(find_inode(&table, 41000), Some(2222));
        assert_eq!(find_inode(&table, 56001), Some(1111));
        assert_eq!(find_inode(&table, 41001), None);
    }

    #[test]
    fn test_find_inode_ignores_zero_inode() {
        // TIME_WAIT rows carry inode 0.
        let table = format!("{TCP_HEADER}{}", tcp_row(41000, 0));
        assert_eq!(find_inode(&table, 41000), None);
    }

    #[test]
    fn test_find_inode_ipv6_row() {
        let row = "   0: 00000000000000000000000001000000:A028 00000000000000000000000001000000:DAC1 01 00000000:00000000 00:00000000 00000000  1000        0 3333 1 0000000000000000 20 4 30 10 -1\n";
        let table = format!("{TCP_HEADER}{row}");
        assert_eq!(find_inode(&table, 0xA028), Some(3333));
    }

    #[cfg(unix)]
    fn fake_proc(port: u16, inode: u64, pid: u32, comm: &str) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("net")).unwrap();
        fs::write(
            root.path().join("net/tcp"),
            format!("{TCP_HEADER}{}", tcp_row(port, inode)),
        )
        .unwrap();

        let fd_dir = root.path().join(pid.to_string()).join("fd");
        fs::create_dir_all(&fd_dir).unwrap();
        std::os::unix::fs::symlink("/dev/null", fd_dir.join("0")).unwrap();
        std::os::unix::fs::symlink(format!("socket:[{inode}]"), fd_dir.join("7")).unwrap();
        fs::write(root.path().join(pid.to_string()).join("comm"), format!("{comm}\n")).unwrap();

        // Non-pid entries are skipped.
        fs::create_dir_all(root.path().join("sys")).unwrap();
        root
    }

    #[test]
    #[cfg(unix)]
    fn test_resolves_through_fake_proc() {
        let root = fake_proc(41000, 56789, 4242, "hello-app");
        let resolver = ProcPortResolver::with_root(root.path());

        assert_eq!(resolver.name_by_port(41000).unwrap(), "hello-app");
    }

    #[test]
    #[cfg(unix)]
    fn test_unknown_port_not_found() {
        let root = fake_proc(41000, 56789, 4242, "hello-app");
        let resolver = ProcPortResolver::with_root(root.path());

        assert!(matches!(
            resolver.name_by_port(41001),
            Err(ResolveError::NotFound(41001))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_orphan_socket_not_found() {
        let root = fake_proc(41000, 56789, 4242, "hello-app");
        fs::remove_file(root.path().join("4242/fd/7")).unwrap();
        let resolver = ProcPortResolver::with_root(root.path());

        assert!(matches!(
            resolver.name_by_port(41000),
            Err(ResolveError::NotFound(41000))
        ));
    }

    #[test]
    fn test_missing_tables_not_found() {
        let resolver = ProcPortResolver::with_root("/definitely/not/a/procfs");
        // No tables at all means no inode, reported as not found.
        assert!(matches!(
            resolver.name_by_port(41000),
            Err(ResolveError::NotFound(41000))
        ));
    }
}
