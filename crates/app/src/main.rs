//! Model inspector: loads an OBJ with its material libraries and reports
//! what a renderer would upload.
//!
//! Usage: app <model.obj> [--materials] [--log=<filter>]

use anyhow::{Result, bail};
use asset::{Attribute, Model};

struct Args {
    path: String,
    show_materials: bool,
    log_filter: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut path = None;
    let mut show_materials = false;
    let mut log_filter = None;

    for arg in std::env::args().skip(1) {
        if arg == "--materials" {
            show_materials = true;
        } else if let Some(val) = arg.strip_prefix("--log=") {
            log_filter = Some(val.to_owned());
        } else if arg.starts_with("--") {
            eprintln!("[warn] Unknown flag '{}', ignoring.", arg);
        } else if path.is_none() {
            path = Some(arg);
        } else {
            bail!("Only one model path may be given (got extra '{}')", arg);
        }
    }

    let Some(path) = path else {
        bail!("Usage: app <model.obj> [--materials] [--log=<filter>]");
    };

    Ok(Args {
        path,
        show_materials,
        log_filter,
    })
}

fn init_logging(filter: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }
    builder.init();
}

fn report(model: &Model, show_materials: bool) {
    log::info!(
        "Model {:?}: {} geometries, material libs {:?}",
        model.base_dir,
        model.geometries().len(),
        model.obj.material_libs
    );

    for (i, (geometry, material)) in model.parts().enumerate() {
        let attrs: Vec<_> = geometry
            .data
            .attributes()
            .map(|(attr, _)| attr.name())
            .collect();
        let bytes: usize = Attribute::ALL
            .into_iter()
            .filter_map(|a| geometry.data.as_bytes(a))
            .map(<[u8]>::len)
            .sum();
        println!(
            "#{i:<3} object={:?} groups={:?} material={:?} vertices={} attributes=[{}] bytes={}",
            geometry.object,
            geometry.groups,
            geometry.material,
            geometry.data.vertex_count(),
            attrs.join(", "),
            bytes
        );
        if show_materials {
            println!("     {:?}", material);
        }
    }

    match model.extents() {
        Some(extents) => println!(
            "extents min={} max={} center={} radius={:.3}",
            extents.min,
            extents.max,
            extents.center(),
            extents.radius()
        ),
        None => println!("extents: model has no positions"),
    }

    let textures = model.texture_paths();
    if !textures.is_empty() {
        println!("textures:");
        for path in textures {
            println!("  {}", path.display());
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;
    init_logging(args.log_filter.as_deref());

    let model = asset::load_model_from_path(&args.path)?;
    report(&model, args.show_materials);

    Ok(())
}
