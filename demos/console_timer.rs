//! Console renderer for the countdown core.
//!
//! A `calloop` event loop owns the engine; a background thread feeds stdin
//! commands through a channel source. The clock line is an effect (it
//! re-prints whenever the observed state changes) and the progress arc is
//! an `AnimationState` advanced while the loop polls at frame rate.
//!
//! Commands: `p` toggles play/pause, `s` stops, `q` quits.

use std::cell::{Cell, RefCell};
use std::io::BufRead;
use std::rc::Rc;
use std::time::Duration;

use calloop::channel::{channel, Event};
use calloop::ping::make_ping;
use calloop::EventLoop;

use clessidra::prelude::*;

fn draw_arc(fraction: f32) {
    let filled = ((fraction / 5.0).round() as usize).min(20);
    println!("  [{}{}] {:>3.0}%", "#".repeat(filled), "-".repeat(20 - filled), fraction);
}

fn main() {
    env_logger::init();

    let mut event_loop: EventLoop<()> = EventLoop::try_new().expect("failed to create event loop");
    let handle = event_loop.handle();

    // Signal writes request a redraw through this ping.
    let (ping, ping_source) = make_ping().expect("failed to create ping");
    init_wakeup(ping);
    handle
        .insert_source(ping_source, |_, _, _| {})
        .expect("failed to register wakeup source");

    let engine = Rc::new(RefCell::new(TimerEngine::new(CalloopScheduler::new(
        handle.clone(),
    ))));
    let mapper = ProgressMapper::new(engine.borrow().total());

    // Clock line: re-runs on every observed state change, starting with
    // the initial snapshot.
    let minutes = engine.borrow().minutes();
    let seconds = engine.borrow().seconds();
    let paused = engine.borrow().paused();
    let _clock = create_effect(move || {
        let state = if paused.get() { "paused" } else { "running" };
        println!("{:02}:{:02}  ({state})", minutes.get(), seconds.get());
    });

    // Stdin commands come in over a channel source.
    let (sender, command_source) = channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line.trim().to_string()).is_err() {
                break;
            }
        }
    });

    let exit = Rc::new(Cell::new(false));
    let engine_for_commands = engine.clone();
    let exit_flag = exit.clone();
    handle
        .insert_source(command_source, move |event, _, _| {
            if let Event::Msg(command) = event {
                match command.as_str() {
                    "p" => engine_for_commands.borrow_mut().play_pause(),
                    "s" => engine_for_commands.borrow_mut().stop(),
                    "q" => exit_flag.set(true),
                    other => {
                        if !other.is_empty() {
                            println!("unknown command: {other} (p = play/pause, s = stop, q = quit)");
                        }
                    }
                }
            }
        })
        .expect("failed to register command source");

    println!("countdown ready: p = play/pause, s = stop, q = quit");

    let remaining = engine.borrow().remaining();
    let mut arc = AnimationState::new(100.0f32, Transition::default());

    loop {
        // Poll at frame rate while the arc is moving, otherwise sleep
        // until a tick or a command wakes us.
        let timeout = if arc.is_animating() {
            Some(Duration::from_millis(16))
        } else {
            None
        };
        event_loop
            .dispatch(timeout, &mut ())
            .expect("event loop dispatch failed");

        if exit.get() {
            break;
        }

        if take_redraw_request() {
            let target = mapper.target(remaining.get_untracked());
            arc.animate_with(target.fraction as f32, target.transition);
        }
        if let AdvanceResult::Changed(fraction) = arc.advance() {
            draw_arc(fraction);
        }
    }
}
