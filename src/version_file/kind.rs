use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::paths::get_file_extension;
use crate::version_file::pattern::VersionPattern;

static LEGACY_ASSEMBLY: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "assembly attribute",
        r#"(?m)^(?P<prefix>[ \t]*\[assembly: Assembly[0-9A-Za-z_]*Version\(")(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>\.?)(?P<fourth>[0-9]*)(?P<suffix>"\)\].*)$"#,
    )
    .expect("hardcoded regex must compile")
});

// Package version only; it also answers get_full_version for SDK projects.
static SDK_PACKAGE: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "package",
        r"(?m)^(?P<prefix>[ \t]*<Version>)(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>[0-9A-Za-z_-]*\.?)(?P<fourth>[0-9]*)(?P<suffix>[0-9A-Za-z_-]*</Version>.*)$",
    )
    .expect("hardcoded regex must compile")
});

static SDK_ASSEMBLY: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "assembly/file",
        r"(?m)^(?P<prefix>[ \t]*<(?:File|Assembly)Version>)(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>\.?)(?P<fourth>[0-9]*)(?P<suffix></(?:File|Assembly)Version>.*)$",
    )
    .expect("hardcoded regex must compile")
});

static NATIVE_HEADER: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "resource header",
        r"(?m)^(?P<prefix>[ \t]*[0-9A-Za-z_]*VERSION )(?P<major>[0-9]+)(?P<d1>,)(?P<minor>[0-9]+)(?P<d2>,)(?P<patch>[0-9]+)(?P<qualifier>,)(?P<fourth>[0-9]+)(?P<suffix>.*)$",
    )
    .expect("hardcoded regex must compile")
});

static NATIVE_STRING: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "resource string",
        r#"(?m)^(?P<prefix>[ \t]*VALUE "[0-9A-Za-z_]*Version", ")(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>\.)(?P<fourth>[0-9]+)(?P<suffix>".*)$"#,
    )
    .expect("hardcoded regex must compile")
});

static BUILD_SCRIPT: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "build script",
        r#"(?m)^(?P<prefix>[ \t]*version = ["'])(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>[0-9A-Za-z_-]*\.?)(?P<fourth>[0-9]*)(?P<suffix>[0-9A-Za-z_-]*["'].*)$"#,
    )
    .expect("hardcoded regex must compile")
});

static MANIFEST_JSON: LazyLock<VersionPattern> = LazyLock::new(|| {
    VersionPattern::new(
        "manifest",
        r#"(?m)^(?P<prefix>[ \t]*"version"[ \t]*:[ \t]*")(?P<major>[0-9]+)(?P<d1>\.)(?P<minor>[0-9]+)(?P<d2>\.)(?P<patch>[0-9]+)(?P<qualifier>[0-9A-Za-z_-]*\.?)(?P<fourth>[0-9]*)(?P<suffix>[0-9A-Za-z_-]*"[ \t]*,?.*)$"#,
    )
    .expect("hardcoded regex must compile")
});

/// Supported version file formats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// `AssemblyInfo.cs` style `[assembly: AssemblyVersion("1.2.3")]` attributes
    LegacyAssembly,
    /// SDK project files with `<Version>` plus `<AssemblyVersion>`/`<FileVersion>`
    SdkManifest,
    /// Native `.rc` resource files with `FILEVERSION` tuples and `VALUE` strings
    NativeResource,
    /// Gradle `version = "1.2.3"` assignments
    BuildScript,
    /// JSON manifests with a `"version"` field
    ManifestJson,
}

/// How the patterns of a kind relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteMode {
    /// Each pattern is rewritten on its own and must match at least once.
    Independent,
    /// The first pattern's first token decides the revision; tokens of the
    /// second pattern are optional and follow it.
    LockStep,
}

/// Declarative description of a file kind.
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    pub patterns: Vec<&'static VersionPattern>,
    pub mode: RewriteMode,
}

impl FileKind {
    pub const ALL: [FileKind; 5] = [
        FileKind::LegacyAssembly,
        FileKind::SdkManifest,
        FileKind::NativeResource,
        FileKind::BuildScript,
        FileKind::ManifestJson,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FileKind::LegacyAssembly => "legacy-assembly",
            FileKind::SdkManifest => "sdk-manifest",
            FileKind::NativeResource => "native-resource",
            FileKind::BuildScript => "build-script",
            FileKind::ManifestJson => "manifest-json",
        }
    }

    pub fn descriptor(self) -> KindDescriptor {
        match self {
            FileKind::LegacyAssembly => KindDescriptor {
                patterns: vec![&*LEGACY_ASSEMBLY],
                mode: RewriteMode::Independent,
            },
            FileKind::SdkManifest => KindDescriptor {
                patterns: vec![&*SDK_PACKAGE, &*SDK_ASSEMBLY],
                mode: RewriteMode::LockStep,
            },
            FileKind::NativeResource => KindDescriptor {
                patterns: vec![&*NATIVE_HEADER, &*NATIVE_STRING],
                mode: RewriteMode::Independent,
            },
            FileKind::BuildScript => KindDescriptor {
                patterns: vec![&*BUILD_SCRIPT],
                mode: RewriteMode::Independent,
            },
            FileKind::ManifestJson => KindDescriptor {
                patterns: vec![&*MANIFEST_JSON],
                mode: RewriteMode::Independent,
            },
        }
    }

    /// Guesses the kind from a file name.
    ///
    /// # Returns
    /// * `Some(FileKind)` - For recognised names and extensions
    /// * `None` - If the file is not a known version file
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let file_name = path.file_name()?.to_str()?.to_ascii_lowercase();

        if file_name == "assemblyinfo.cs" || file_name == "assemblyinfo.vb" {
            return Some(FileKind::LegacyAssembly);
        }
        if file_name == "build.gradle" || file_name == "build.gradle.kts" {
            return Some(FileKind::BuildScript);
        }

        match get_file_extension(&file_name)?.as_str() {
            ".csproj" | ".vbproj" | ".fsproj" | ".props" => Some(FileKind::SdkManifest),
            ".rc" => Some(FileKind::NativeResource),
            ".json" => Some(FileKind::ManifestJson),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
