use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

use crate::config::UpgradeStat;
use crate::model::{GameAction, Phase, World};
use crate::state::{Spawner, WorldStore};
use super::{
    controls_panel::ControlsPanel,
    game_over_overlay::GameOverOverlay,
    stats_panel::StatsPanel,
    upgrade_panel::{TowerStats, UpgradePanel},
};

#[derive(Properties, PartialEq, Clone)]
pub struct RunViewProps {
    pub world: WorldStore,
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, PI * 2.0).ok();
    ctx.fill();
}

fn draw_scene(ctx: &CanvasRenderingContext2d, world: &World) {
    let cfg = &world.config;
    ctx.clear_rect(0.0, 0.0, cfg.canvas_width as f64, cfg.canvas_height as f64);

    // path polyline
    if let Some(first) = cfg.path.first() {
        ctx.set_stroke_style_str("white");
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in &cfg.path {
            ctx.line_to(p.x, p.y);
        }
        ctx.stroke();
    }

    for (_, e) in world.enemies.iter() {
        fill_circle(ctx, e.x, e.y, cfg.enemy.radius, "red");
    }

    for t in &world.towers {
        fill_circle(ctx, t.x, t.y, cfg.tower.radius, "blue");
        if t.selected {
            ctx.set_stroke_style_str("lightblue");
            ctx.set_line_width(1.0);
            ctx.begin_path();
            ctx.arc(t.x, t.y, t.range, 0.0, PI * 2.0).ok();
            ctx.stroke();
        }
        for p in &t.projectiles {
            fill_circle(ctx, p.x, p.y, cfg.projectile.radius, "yellow");
        }
    }
}

#[function_component(RunView)]
pub fn run_view(props: &RunViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let spawner = use_mut_ref(Spawner::default);

    // Effect: game over notification, fires once per transition
    {
        let spawner = spawner.clone();
        use_effect_with(props.world.phase, move |phase| {
            if *phase == Phase::GameOver {
                if let Some(win) = web_sys::window() {
                    spawner.borrow_mut().disarm(&win);
                    if let Err(err) = win.alert_with_message("Game Over!") {
                        tracing::warn!(?err, "game over alert failed");
                    }
                }
            }
            || ()
        });
    }
    // Main mount effect (frame loop)
    {
        let canvas_ref = canvas_ref.clone();
        let world = props.world.clone();
        let spawner = spawner.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let ctx = canvas_ref
                .cast::<HtmlCanvasElement>()
                .and_then(|c| c.get_context("2d").ok().flatten())
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
            let raf_id = Rc::new(RefCell::new(None::<i32>));
            let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                Rc::new(RefCell::new(None));
            match (&window, ctx) {
                (Some(window), Some(ctx)) => {
                    let raf_id_loop = raf_id.clone();
                    let closure_cell_loop = closure_cell.clone();
                    let window_loop = window.clone();
                    *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                        // Draw the world this frame's update produced.
                        let latest = world.dispatch(GameAction::Frame);
                        draw_scene(&ctx, &latest);
                        if latest.phase == Phase::GameOver {
                            *raf_id_loop.borrow_mut() = None;
                            tracing::debug!("frame loop stopped");
                            return;
                        }
                        if let Some(cb) = closure_cell_loop.borrow().as_ref() {
                            match window_loop.request_animation_frame(cb.as_ref().unchecked_ref()) {
                                Ok(id) => *raf_id_loop.borrow_mut() = Some(id),
                                Err(err) => tracing::warn!(?err, "requestAnimationFrame failed"),
                            }
                        }
                    })
                        as Box<dyn FnMut()>));
                    if let Some(cb) = closure_cell.borrow().as_ref() {
                        if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                            *raf_id.borrow_mut() = Some(id);
                        }
                    }
                }
                _ => tracing::warn!("no window or 2d canvas context; frame loop not started"),
            }
            // Cleanup
            move || {
                if let Some(window) = &window {
                    if let Some(id) = raf_id.borrow_mut().take() {
                        let _ = window.cancel_animation_frame(id);
                    }
                    spawner.borrow_mut().disarm(window);
                }
                closure_cell.borrow_mut().take();
            }
        });
    }

    let on_canvas_click = {
        let world = props.world.clone();
        Callback::from(move |e: MouseEvent| {
            world.dispatch(GameAction::Click {
                x: e.offset_x() as f64,
                y: e.offset_y() as f64,
            });
        })
    };
    let on_start = {
        let world = props.world.clone();
        let spawner = spawner.clone();
        Callback::from(move |()| {
            if world.latest().phase != Phase::Stopped || spawner.borrow().is_armed() {
                return;
            }
            let started = world.dispatch(GameAction::Start);
            let ticker = world.clone();
            spawner
                .borrow_mut()
                .arm(started.config.spawn_interval_ms, move || {
                    ticker.dispatch(GameAction::SpawnEnemy);
                });
        })
    };
    let on_upgrade = {
        let world = props.world.clone();
        Callback::from(move |stat: UpgradeStat| {
            world.dispatch(GameAction::Upgrade(stat));
        })
    };

    let world = &*props.world;
    let cfg = world.config.clone();
    html! {
        <div style="position:relative; width:100vw; height:100vh; background:#0e1116; color:#c9d1d9;">
            <canvas
                id="gameCanvas"
                ref={canvas_ref}
                width={cfg.canvas_width.to_string()}
                height={cfg.canvas_height.to_string()}
                onclick={on_canvas_click}
                style="display:block; margin:0 auto; background:#161b22; border:1px solid #30363d;"
            />
            <StatsPanel health={world.health} money={world.money} />
            <ControlsPanel
                phase={world.phase}
                tower_cost={cfg.tower.cost}
                enemies={world.enemies.len()}
                on_start={on_start}
            />
            <UpgradePanel
                tower={world.inspected_tower().map(TowerStats::from)}
                money={world.money}
                config={cfg.clone()}
                on_upgrade={on_upgrade}
            />
            <GameOverOverlay show={world.phase == Phase::GameOver} stats={world.stats} />
        </div>
    }
}
