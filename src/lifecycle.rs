/// Component lifecycle as seen by a frame-driven host.
///
/// Hosts call `init` and `after_init` once, then `on_update` every rendered
/// frame and `on_fixed_update` every fixed simulation step, and finally
/// `before_free` and `free` on teardown. Every hook defaults to a no-op.
pub trait Lifecycle {
    fn init(&mut self) {}

    fn after_init(&mut self) {}

    fn before_free(&mut self) {}

    fn free(&mut self) {}

    fn on_update(&mut self, _dt: f32) {}

    fn on_fixed_update(&mut self, _dt: f32) {}
}
