//! Entry point for bagview.
//! Logging, command-line flags, then the platform event loop.

use std::path::PathBuf;

use anyhow::Result;
use corelib::Color;
use platform::ViewerConfig;

fn parse_backend_arg(args: &[String]) -> wgpu::Backends {
    // Accept: --gpu-backend=auto|vulkan|dx12|metal|gl
    let mut backends = wgpu::Backends::all();
    for arg in args {
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            backends = match val.to_ascii_lowercase().as_str() {
                "auto" => wgpu::Backends::all(),
                "vulkan" | "vk" => wgpu::Backends::VULKAN,
                "dx12" | "d3d12" => wgpu::Backends::DX12,
                "metal" | "mtl" => wgpu::Backends::METAL,
                "gl" | "opengl" | "gles" => wgpu::Backends::GL,
                other => {
                    log::warn!("Unknown backend '{other}', falling back to auto.");
                    wgpu::Backends::all()
                }
            };
        }
    }
    backends
}

fn parse_flag(args: &[String], name: &str) -> Option<bool> {
    let mut value = None;
    for arg in args {
        let Some(rest) = arg.strip_prefix(name) else {
            continue;
        };
        if rest.is_empty() {
            value = Some(true);
        } else if let Some(val) = rest.strip_prefix('=') {
            value = Some(matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ));
        }
    }
    value
}

fn parse_size_args(args: &[String]) -> (u32, u32) {
    let mut w: Option<u32> = None;
    let mut h: Option<u32> = None;

    for arg in args {
        if let Some(v) = arg.strip_prefix("--size=") {
            if let Some((sw, sh)) = v.split_once('x').or_else(|| v.split_once('X')) {
                if let (Ok(pw), Ok(ph)) = (sw.parse::<u32>(), sh.parse::<u32>()) {
                    w = Some(pw);
                    h = Some(ph);
                }
            }
        } else if let Some(v) = arg.strip_prefix("--width=") {
            if let Ok(pw) = v.parse::<u32>() {
                w = Some(pw);
            }
        } else if let Some(v) = arg.strip_prefix("--height=") {
            if let Ok(ph) = v.parse::<u32>() {
                h = Some(ph);
            }
        }
    }

    let ww = w.unwrap_or(1280).max(1);
    let hh = h.unwrap_or(720).max(1);
    (ww, hh)
}

fn parse_model_arg(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .rev()
        .find_map(|arg| arg.strip_prefix("--model="))
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

fn parse_color_arg(args: &[String]) -> Option<Color> {
    let val = args.iter().rev().find_map(|arg| arg.strip_prefix("--color="))?;
    match val.parse::<Color>() {
        Ok(color) => Some(color),
        Err(err) => {
            log::warn!("Ignoring --color: {err}");
            None
        }
    }
}

fn build_config(args: &[String]) -> ViewerConfig {
    let defaults = ViewerConfig::default();
    let (width, height) = parse_size_args(args);
    ViewerConfig {
        width,
        height,
        backends: parse_backend_arg(args),
        model_path: parse_model_arg(args).unwrap_or(defaults.model_path.clone()),
        initial_color: parse_color_arg(args),
        orbit_controls: !parse_flag(args, "--no-controls").unwrap_or(false),
        asset_loader: !parse_flag(args, "--no-loader").unwrap_or(false),
        show_fps: parse_flag(args, "--show-fps").unwrap_or(false),
        ..defaults
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = build_config(&args);
    log::info!(
        "Starting bagview. Backend: {:?}, model={}, show_fps={}, window_size={}x{}",
        config.backends,
        config.model_path.display(),
        config.show_fps,
        config.width,
        config.height
    );

    platform::run(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_without_flags() {
        let config = build_config(&[]);
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.backends, wgpu::Backends::all());
        assert_eq!(config.model_path, PathBuf::from("./leatherhandbag3dmodel.glb"));
        assert!(config.initial_color.is_none());
        assert!(config.orbit_controls);
        assert!(config.asset_loader);
        assert!(!config.show_fps);
    }

    #[test]
    fn size_flags() {
        assert_eq!(parse_size_args(&args(&["--size=800x600"])), (800, 600));
        assert_eq!(parse_size_args(&args(&["--size=640X480", "--height=300"])), (640, 300));
        assert_eq!(parse_size_args(&args(&["--width=0"])), (1, 720));
        assert_eq!(parse_size_args(&args(&["--size=banana"])), (1280, 720));
    }

    #[test]
    fn backend_flag() {
        assert_eq!(parse_backend_arg(&args(&["--gpu-backend=vk"])), wgpu::Backends::VULKAN);
        assert_eq!(parse_backend_arg(&args(&["--gpu-backend=GL"])), wgpu::Backends::GL);
        assert_eq!(parse_backend_arg(&args(&["--gpu-backend=nope"])), wgpu::Backends::all());
    }

    #[test]
    fn toggles_and_values() {
        let config = build_config(&args(&[
            "--no-controls",
            "--no-loader=off",
            "--show-fps=on",
            "--model=bags/tote.glb",
            "--color=#8b4513",
        ]));
        assert!(!config.orbit_controls);
        assert!(config.asset_loader);
        assert!(config.show_fps);
        assert_eq!(config.model_path, PathBuf::from("bags/tote.glb"));
        assert_eq!(config.initial_color, Some(Color::from_hex(0x8b4513)));
    }

    #[test]
    fn bad_color_is_ignored() {
        assert_eq!(parse_color_arg(&args(&["--color=#zzzzzz"])), None);
        assert_eq!(parse_flag(&args(&["--show-fpsx"]), "--show-fps"), None);
    }
}
