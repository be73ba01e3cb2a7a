#![doc = r#"
sass-generator — compile a directory of SCSS sources into CSS, with optional source maps.

The crate drives the [grass](https://docs.rs/grass) compiler over every `.scss` file of an
input directory and writes one `.css` file per source into an output directory. When source
maps are requested, line annotations are emitted during compilation, read back from the
compiled CSS, and encoded into a `<name>.css.map` file next to it.

Quick start: compile a directory
--------------------------------
```rust,no_run
use sass_generator::{RawOptions, SassGenerator, effective_config};

fn main() -> sass_generator::Result<()> {
    let raw = RawOptions {
        source_maps: true,
        io: "web/scss:web/css".to_string(),
        ..RawOptions::default()
    };

    let mut generator = SassGenerator::new(effective_config(&raw)?)?;
    generator.compile_all();

    for warning in generator.warnings() {
        eprintln!("{warning}");
    }
    Ok(())
}
```

Step by step
------------
`compile` and `generate_map` can be called per file; both return `Ok(None)` when the
file failed (the cause is kept in its [`SourceFileRecord`]) and only fail for contract
violations such as asking for a map before compiling.

```rust,no_run
use sass_generator::{Error, RawOptions, SassGenerator, effective_config};

fn main() -> sass_generator::Result<()> {
    let config = effective_config(&RawOptions {
        source_maps: true,
        ..RawOptions::default()
    })?;
    let mut generator = SassGenerator::new(config)?;

    for source in generator.source_files() {
        if generator.compile(&source)?.is_some() {
            generator.generate_map(&source)?;
        }
    }

    match generator.generate_map(std::path::Path::new("elsewhere.scss")) {
        Err(Error::UnknownFile { path }) => eprintln!("not enumerated: {}", path.display()),
        other => println!("{other:?}"),
    }
    Ok(())
}
```

Error handling
--------------
Configuration problems (malformed `io` argument, unknown format, unusable directories) are
returned as [`Error`] before any file is touched. Per-file failures never abort the batch.

Useful modules
--------------
- [`api`] — the batch driver.
- [`compiler`] — the `StyleCompiler` seam and its grass implementation.
- [`maps`] — annotation scanning and source map encoding.
- [`core`] — option derivation, directory resolution, source enumeration, presets.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod cli;
pub mod compiler;
pub mod core;
pub mod error;
pub mod maps;
pub mod types;

// Curated public API surface
pub use api::{BatchEvent, BatchReport, SassGenerator, SourceFileRecord};
pub use compiler::{CompileError, CompilerOptions, GrassCompiler, StyleCompiler};
pub use crate::core::params::{BatchConfig, RawOptions, effective_config};
pub use crate::core::preset::{Preset, load_preset, save_preset};
pub use error::{Error, Result};
pub use maps::{MapBuilder, Mapping};
pub use types::{OutputStyle, PathRebase};
