// Fixed-interval enemy spawner, independent of the animation-frame loop.
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

#[derive(Default)]
pub struct Spawner {
    interval_id: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl Spawner {
    pub fn is_armed(&self) -> bool {
        self.interval_id.is_some()
    }

    /// Fires `on_tick` once right away and then every `interval_ms`. Arming an
    /// already armed spawner does nothing and returns false.
    pub fn arm(&mut self, interval_ms: u32, mut on_tick: impl FnMut() + 'static) -> bool {
        if self.is_armed() {
            return false;
        }
        let Some(window) = web_sys::window() else {
            tracing::warn!("no window; spawner not armed");
            return false;
        };
        on_tick();
        let tick = Closure::wrap(Box::new(on_tick) as Box<dyn FnMut()>);
        let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
        match window.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), timeout) {
            Ok(id) => {
                self.interval_id = Some(id);
                self.tick = Some(tick);
                tracing::debug!(interval_ms, "spawner armed");
                true
            }
            Err(err) => {
                tracing::warn!(?err, "could not schedule spawner");
                false
            }
        }
    }

    pub fn disarm(&mut self, window: &Window) {
        if let Some(id) = self.interval_id.take() {
            window.clear_interval_with_handle(id);
            tracing::debug!("spawner disarmed");
        }
        self.tick = None;
    }
}
