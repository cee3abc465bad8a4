use anyhow::{Context, Result};
use tracing::debug;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::constants::x11;

/// Pre-cached X11 atoms to avoid repeated roundtrips
#[derive(Debug)]
pub struct CachedAtoms {
    pub net_client_list: Atom,
    pub net_wm_name: Atom,
    pub net_wm_window_opacity: Atom,
    pub utf8_string: Atom,
}

fn intern(conn: &RustConnection, name: &str) -> Result<Atom> {
    Ok(conn
        .intern_atom(false, name.as_bytes())
        .with_context(|| format!("Failed to intern {name} atom"))?
        .reply()
        .with_context(|| format!("Failed to get reply for {name} atom"))?
        .atom)
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        // Do all intern_atom roundtrips once at startup
        Ok(Self {
            net_client_list: intern(conn, "_NET_CLIENT_LIST")?,
            net_wm_name: intern(conn, "_NET_WM_NAME")?,
            net_wm_window_opacity: intern(conn, "_NET_WM_WINDOW_OPACITY")?,
            utf8_string: intern(conn, "UTF8_STRING")?,
        })
    }
}

/// Top-level client windows managed by the window manager
pub fn client_windows(conn: &RustConnection, screen: &Screen, atoms: &CachedAtoms) -> Result<Vec<Window>> {
    let prop = conn
        .get_property(false, screen.root, atoms.net_client_list, AtomEnum::WINDOW, 0, u32::MAX)
        .context("Failed to query _NET_CLIENT_LIST")?
        .reply()
        .context("Failed to get reply for _NET_CLIENT_LIST")?;
    Ok(prop
        .value32()
        .ok_or_else(|| anyhow::anyhow!("Invalid return from _NET_CLIENT_LIST"))?
        .collect())
}

/// True when WM_CLASS marks the window as a fence
pub fn is_fence_window(conn: &RustConnection, window: Window) -> Result<bool> {
    let class_prop = conn
        .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, x11::MAX_PROPERTY_LENGTH)
        .with_context(|| format!("Failed to query WM_CLASS for window {window}"))?
        .reply()
        .with_context(|| format!("Failed to get WM_CLASS reply for window {window}"))?;
    Ok(is_fence_class(&class_prop.value))
}

fn is_fence_class(value: &[u8]) -> bool {
    parse_wm_class(value).any(|part| part == x11::FENCE_WM_CLASS.as_bytes())
}

/// WM_CLASS is "instance\0class\0"
fn parse_wm_class(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value.split(|b| *b == 0).filter(|part| !part.is_empty())
}

/// Window title: _NET_WM_NAME (UTF-8) with WM_NAME as fallback
pub fn window_title(conn: &RustConnection, window: Window, atoms: &CachedAtoms) -> Result<String> {
    let net_name = conn
        .get_property(false, window, atoms.net_wm_name, atoms.utf8_string, 0, x11::MAX_PROPERTY_LENGTH)
        .with_context(|| format!("Failed to query _NET_WM_NAME for window {window}"))?
        .reply()
        .with_context(|| format!("Failed to get _NET_WM_NAME reply for window {window}"))?;
    if !net_name.value.is_empty() {
        return Ok(String::from_utf8_lossy(&net_name.value).into_owned());
    }

    debug!(window, "No _NET_WM_NAME, falling back to WM_NAME");
    let name = conn
        .get_property(false, window, AtomEnum::WM_NAME, AtomEnum::STRING, 0, x11::MAX_PROPERTY_LENGTH)
        .with_context(|| format!("Failed to query WM_NAME for window {window}"))?
        .reply()
        .with_context(|| format!("Failed to get WM_NAME reply for window {window}"))?;
    Ok(String::from_utf8_lossy(&name.value).into_owned())
}
