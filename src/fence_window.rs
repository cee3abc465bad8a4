use anyhow::{Context, Result};
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use crate::broadcast::FenceSurface;
use crate::style::FenceStyle;
use crate::x11_utils::{client_windows, is_fence_window, window_title, CachedAtoms};

/// An open fence window on the X server
#[derive(Debug)]
pub struct X11Fence<'a> {
    pub window: Window,
    title: String,
    /// 32 means an ARGB visual, so the tint goes into the pixel too
    depth: u8,
    conn: &'a RustConnection,
    atoms: &'a CachedAtoms,
}

impl FenceSurface for X11Fence<'_> {
    fn title(&self) -> &str {
        &self.title
    }

    fn apply_style(&mut self, style: FenceStyle) -> Result<()> {
        let tinted = style.tinted_color();
        let pixel = if self.depth == 32 { tinted.argb32() } else { tinted.rgb() };
        debug!(window = self.window, color = %tinted, alpha = tinted.alpha(), depth = self.depth, "Painting fence background");

        self.conn
            .change_window_attributes(self.window, &ChangeWindowAttributesAux::new().background_pixel(pixel))
            .context(format!("Failed to set background for fence '{}'", self.title))?;
        self.conn
            .clear_area(true, self.window, 0, 0, 0, 0)
            .context(format!("Failed to repaint fence '{}'", self.title))?;
        self.conn
            .change_property32(
                PropMode::REPLACE,
                self.window,
                self.atoms.net_wm_window_opacity,
                AtomEnum::CARDINAL,
                &[style.tint.to_window_opacity()],
            )
            .context(format!("Failed to set opacity for fence '{}'", self.title))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }
}

/// Every fence window currently mapped by the window manager
pub fn open_fences<'a>(
    conn: &'a RustConnection,
    screen: &Screen,
    atoms: &'a CachedAtoms,
) -> Result<Vec<X11Fence<'a>>> {
    let mut fences = Vec::new();
    for window in client_windows(conn, screen, atoms)? {
        // Windows can vanish between listing and querying
        match is_fence_window(conn, window) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!(window, error = %e, "Skipping window");
                continue;
            }
        }

        let title = window_title(conn, window, atoms)?;
        let depth = conn
            .get_geometry(window)
            .context("Failed to query fence geometry")?
            .reply()
            .with_context(|| format!("Failed to get geometry for fence '{title}'"))?
            .depth;
        debug!(window, title = %title, depth, "Found fence window");
        fences.push(X11Fence {
            window,
            title,
            depth,
            conn,
            atoms,
        });
    }
    Ok(fences)
}
