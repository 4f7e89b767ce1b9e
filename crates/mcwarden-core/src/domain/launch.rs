//! Launch description for the supervised process.

use std::path::{Path, PathBuf};

/// Server jar file name inside the server directory.
pub const SERVER_JAR: &str = "server.jar";

/// JVM tuning flags (Aikar's G1 set). Environment constants, not part of
/// the supervision contract.
const JVM_FLAGS: &[&str] = &[
    "-Xmx1G",
    "-Xms512M",
    "-XX:+UseG1GC",
    "-XX:+ParallelRefProcEnabled",
    "-XX:MaxGCPauseMillis=200",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+DisableExplicitGC",
    "-XX:+AlwaysPreTouch",
    "-XX:G1NewSizePercent=30",
    "-XX:G1MaxNewSizePercent=40",
    "-XX:G1HeapRegionSize=8M",
    "-XX:G1ReservePercent=20",
    "-XX:G1HeapWastePercent=5",
    "-XX:G1MixedGCCountTarget=4",
    "-XX:InitiatingHeapOccupancyPercent=15",
    "-XX:G1MixedGCLiveThresholdPercent=90",
    "-XX:G1RSetUpdatingPauseTimePercent=5",
    "-XX:SurvivorRatio=32",
    "-XX:+PerfDisableSharedMem",
    "-XX:MaxTenuringThreshold=1",
    "-Dusing.aikars.flags=https://mcflags.emc.gs",
    "-Daikars.new.flags=true",
];

/// Executable, fixed arguments and working directory of the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl LaunchSpec {
    pub fn new(
        program: impl Into<PathBuf>,
        args: impl IntoIterator<Item = impl Into<String>>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: working_dir.into(),
        }
    }

    /// Paper server launched through `java -jar server.jar --nogui`.
    pub fn paper(java: impl Into<PathBuf>, server_dir: &Path) -> Self {
        let args = JVM_FLAGS
            .iter()
            .copied()
            .chain(["-jar", SERVER_JAR, "--nogui"]);
        Self::new(java, args, server_dir)
    }
}

/// Resolve the java executable from a `JAVA_HOME` value, else rely on `PATH`.
pub fn java_from_home(java_home: Option<&Path>) -> PathBuf {
    java_home.map_or_else(|| PathBuf::from("java"), |home| home.join("bin").join("java"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_spec_ends_with_jar_and_nogui() {
        let spec = LaunchSpec::paper("java", Path::new("/srv/mc"));
        let tail: Vec<_> = spec.args.iter().rev().take(3).rev().cloned().collect();
        assert_eq!(tail, vec!["-jar", "server.jar", "--nogui"]);
        assert_eq!(spec.args[0], "-Xmx1G");
        assert_eq!(spec.working_dir, PathBuf::from("/srv/mc"));
    }

    #[test]
    fn java_resolves_from_home() {
        assert_eq!(
            java_from_home(Some(Path::new("/opt/jdk"))),
            PathBuf::from("/opt/jdk/bin/java")
        );
        assert_eq!(java_from_home(None), PathBuf::from("java"));
    }
}
