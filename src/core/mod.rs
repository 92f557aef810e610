// ─── Legacy Bootstrap Core ───
// Installs an old manifest-described game client beside the program and
// writes a script that launches it.
//
// Architecture:
//   core/
//     config      - bootstrap.json settings with built-in defaults
//     layout      - on-disk directories of an installation
//     version/    - manifest model and loading
//     downloader/ - SHA-1 verified downloads
//     archive     - zip/jar extraction
//     libraries/  - ordinary libraries + primary client archive
//     natives/    - staged native containers, flattened
//     assets/     - bulk legacy resource archive
//     java/       - Java 8 runtime search
//     launch/     - classpath, arguments and start script
//     report      - per-unit outcomes and the run summary
//     bootstrap   - the sequential pipeline tying it together

pub mod archive;
pub mod assets;
pub mod bootstrap;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod java;
pub mod launch;
pub mod layout;
pub mod libraries;
pub mod natives;
pub mod report;
pub mod version;
