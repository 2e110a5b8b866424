use frame_loop::Sample;

/// Clears the window to blue every frame. Nothing is drawn.
struct BlueScreen;

impl Sample for BlueScreen {
    fn title(&self) -> String {
        "D3D11 Blue Screen".into()
    }

    fn clear_color(&self) -> [f32; 4] {
        [0.0, 0.0, 1.0, 1.0]
    }
}

#[cfg(windows)]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    frame_loop::run_sample(BlueScreen)
}

#[cfg(not(windows))]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    eyre::bail!("{} needs Direct3D 11 and only runs on Windows", BlueScreen.title())
}
