// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for a single light driven through the registry.
//!
//! Time is paused, so poll intervals elapse instantly and deterministically.

mod common;

use std::time::Duration;

use common::{FakeBulb, Sent};
use lifx_bridge::{
    ApplyOutcome, ColorMode, Light, LightEvent, LightRegistry, LightStatus, PollOutcome,
    Reachability, RegistryConfig,
};
use serde_json::{Value, json};
use tokio::sync::broadcast;

async fn setup(bulb: &FakeBulb) -> (LightRegistry<FakeBulb>, Light<FakeBulb>) {
    let registry = LightRegistry::new(RegistryConfig::default());
    let light = registry.add(bulb.clone()).await.unwrap();
    (registry, light)
}

async fn apply_and_wait(light: &Light<FakeBulb>, input: Value) {
    if let Some(dispatch) = light.apply(&input).into_dispatch() {
        dispatch.completed().await;
    }
}

fn drain(rx: &mut broadcast::Receiver<LightEvent>) -> Vec<LightEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn turning_on_sets_color_before_power() {
        let bulb = FakeBulb::color("d073d5000001");
        bulb.report(|state| state.power = 0);
        let (_registry, light) = setup(&bulb).await;

        apply_and_wait(&light, json!({ "on": true, "brightness": 50, "duration": 5000 })).await;

        assert_eq!(
            bulb.sent(),
            vec![
                Sent::Color {
                    hue: 0.0,
                    saturation: 100.0,
                    brightness: 50.0,
                    kelvin: 3500.0,
                    duration_ms: 0,
                },
                Sent::Power {
                    on: true,
                    duration_ms: 5000,
                },
            ]
        );
        assert_eq!(light.status(), LightStatus::On { brightness: 50 });
    }

    #[tokio::test(start_paused = true)]
    async fn turning_off_sends_power_only() {
        let bulb = FakeBulb::color("d073d5000001");
        let (_registry, light) = setup(&bulb).await;

        apply_and_wait(&light, json!({ "on": false, "duration": 200 })).await;

        assert_eq!(
            bulb.sent(),
            vec![Sent::Power {
                on: false,
                duration_ms: 200,
            }]
        );
        assert_eq!(light.status(), LightStatus::Off);
        // Color survives power off
        assert_eq!(light.state().brightness(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_and_shorthands() {
        let bulb = FakeBulb::color("d073d5000001");
        let (_registry, light) = setup(&bulb).await;

        apply_and_wait(&light, json!("toggle")).await;
        assert!(!light.state().on());

        apply_and_wait(&light, json!(30)).await;
        assert_eq!(light.status(), LightStatus::On { brightness: 30 });

        apply_and_wait(&light, json!(false)).await;
        assert!(!light.state().on());
    }

    #[tokio::test(start_paused = true)]
    async fn hex_color_on_color_bulb() {
        let bulb = FakeBulb::color("d073d5000001");
        let (_registry, light) = setup(&bulb).await;

        apply_and_wait(&light, json!({ "hex": "#0000ff", "duration": 750 })).await;

        assert_eq!(
            bulb.sent(),
            vec![Sent::Color {
                hue: 240.0,
                saturation: 100.0,
                brightness: 100.0,
                kelvin: 3500.0,
                duration_ms: 750,
            }]
        );
        let message = light.state_message();
        assert_eq!(message.payload.color, "blue");
        assert_eq!(message.state.mode(), ColorMode::Color);
    }

    #[tokio::test(start_paused = true)]
    async fn temperature_on_white_bulb() {
        let bulb = FakeBulb::white("d073d5000002");
        let (_registry, light) = setup(&bulb).await;

        apply_and_wait(&light, json!({ "kelvin": 2700 })).await;

        let sent = bulb.sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(
            sent[0],
            Sent::Color { saturation, kelvin, duration_ms: 0, .. } if saturation == 0.0 && kelvin == 2700.0
        ));
        assert_eq!(light.state().mode(), ColorMode::Temperature);
        assert_eq!(light.state_message().payload.kelvin, Some(2700));
    }

    #[tokio::test(start_paused = true)]
    async fn infrared_level() {
        let bulb = FakeBulb::night_vision("d073d5000003");
        let (_registry, light) = setup(&bulb).await;
        assert_eq!(light.max_ir(), Some(0));

        apply_and_wait(&light, json!({ "maxIR": 60 })).await;

        assert_eq!(bulb.sent(), vec![Sent::Infrared(60.0)]);
        assert_eq!(light.max_ir(), Some(60));
    }

    #[tokio::test(start_paused = true)]
    async fn unrecognized_payload_is_a_warning() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        let mut rx = registry.subscribe();

        let outcome = light.apply(&json!({ "blink": true }));

        assert!(matches!(outcome, ApplyOutcome::Unhandled));
        assert!(bulb.sent().is_empty());
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["event"], "warning");
        assert_eq!(json["detail"]["blink"], true);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_command_is_an_error_event() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        let mut rx = registry.subscribe();
        bulb.reject_commands(true);

        apply_and_wait(&light, json!({ "on": true, "bri": 10 })).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events[0].is_change());
        let json = serde_json::to_value(&events[1]).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["message"], "Command failed");
        assert_eq!(json["detail"]["command"], "setColor(0, 100, 10, 3500K, 0ms)");
        // Local intent is kept
        assert_eq!(light.state().brightness(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_command_publishes_nothing() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        apply_and_wait(&light, json!({ "bri": 40 })).await;
        let mut rx = registry.subscribe();

        apply_and_wait(&light, json!({ "bri": 40 })).await;
        apply_and_wait(&light, json!({ "maxIR": 50 })).await;

        assert!(drain(&mut rx).is_empty());
        assert_eq!(light.max_ir(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_sees_local_changes() {
        let bulb = FakeBulb::color("d073d5000001");
        let (_registry, light) = setup(&bulb).await;
        let mut watch = light.watch();

        light.apply(&json!({ "hue": 120 }));

        assert!(watch.has_changed().unwrap());
        assert_eq!(watch.borrow_and_update().hue(), 120);
    }
}

// ============================================================================
// Polling
// ============================================================================

mod polling {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn external_change_is_an_update() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        let mut rx = registry.subscribe();

        bulb.report(|state| state.color.hue = 240.0);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(light.state().hue(), 240);
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        let message = events[0].state_message().unwrap();
        assert!(events[0].is_update());
        assert_eq!(message.payload.color, "blue");
    }

    #[tokio::test(start_paused = true)]
    async fn transition_readings_are_suppressed() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        let mut rx = registry.subscribe();

        apply_and_wait(&light, json!({ "bri": 20, "duration": 1000 })).await;
        // Mid-fade reading
        bulb.report(|state| state.color.brightness = 60.0);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(light.state().brightness(), 20);

        // Fade finished, window (2 s margin + 1 s) over
        bulb.report(|state| state.color.brightness = 20.0);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(light.state().brightness(), 20);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_change());

        bulb.report(|state| state.color.brightness = 80.0);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(light.state().brightness(), 80);
        assert!(drain(&mut rx).iter().all(LightEvent::is_update));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_polls_are_silent() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        let mut rx = registry.subscribe();
        let before = light.state();
        let fetches = bulb.state_fetches();

        bulb.set_offline(true);
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(bulb.state_fetches(), fetches + 4);
        assert_eq!(light.state(), before);
        assert_eq!(light.reachability(), Reachability::Online);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn power_off_reading_keeps_color() {
        let bulb = FakeBulb::color("d073d5000001");
        let (_registry, light) = setup(&bulb).await;

        bulb.report(|state| {
            state.power = 0;
            state.color.brightness = 0.0;
        });

        assert_eq!(light.refresh().await, PollOutcome::Updated);
        assert!(!light.state().on());
        assert_eq!(light.state().brightness(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn label_follows_device() {
        let bulb = FakeBulb::color("d073d5000001");
        let (_registry, light) = setup(&bulb).await;

        bulb.report(|state| state.label = Some("Porch".to_string()));
        light.refresh().await;

        assert_eq!(light.label().as_deref(), Some("Porch"));
    }
}

// ============================================================================
// Reachability
// ============================================================================

mod reachability {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn offline_light_stops_polling_and_drops_commands() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        let mut rx = registry.subscribe();

        assert!(registry.set_reachable(light.id(), false).await.unwrap());
        let fetches = bulb.state_fetches();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(bulb.state_fetches(), fetches);
        assert_eq!(light.status(), LightStatus::Disconnected);
        assert!(matches!(
            light.apply(&json!({ "on": false })),
            ApplyOutcome::Unreachable
        ));
        assert!(bulb.sent().is_empty());
        assert!(light.state().on());

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(!events[0].state_message().unwrap().payload.reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn back_online_polls_at_once() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        registry.set_reachable(light.id(), false).await.unwrap();
        let mut rx = registry.subscribe();

        bulb.report(|state| state.color.brightness = 40.0);
        assert!(registry.set_reachable(light.id(), true).await.unwrap());

        assert_eq!(light.state().brightness(), 40);
        assert!(light.is_polling());
        // The first poll lands before the light is announced online
        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events[0].is_update());
        assert!(events[1].is_change());
        assert!(events[1].state_message().unwrap().payload.reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_during_first_poll_stops_everything() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        registry.set_reachable(light.id(), false).await.unwrap();
        bulb.delay_state(Duration::from_millis(800));
        let mut rx = registry.subscribe();

        let online = tokio::spawn({
            let light = light.clone();
            async move { light.set_reachable(true).await }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(registry.set_reachable(light.id(), false).await.unwrap());
        assert!(online.await.unwrap());

        let fetches = bulb.state_fetches();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(bulb.state_fetches(), fetches);
        assert!(!light.is_polling());
        assert_eq!(light.status(), LightStatus::Disconnected);
        assert!(drain(&mut rx).iter().all(|event| {
            !event.state_message().unwrap().payload.reachable
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn command_during_first_poll_is_refused() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;
        registry.set_reachable(light.id(), false).await.unwrap();
        bulb.delay_state(Duration::from_millis(800));

        let online = tokio::spawn({
            let light = light.clone();
            async move { light.set_reachable(true).await }
        });
        tokio::time::sleep(Duration::from_millis(200)).await;

        let outcome = registry
            .apply(light.id(), &json!({ "on": false }))
            .await
            .unwrap();
        assert!(matches!(outcome, ApplyOutcome::Unreachable));
        assert_eq!(light.reachability(), Reachability::Offline);

        assert!(online.await.unwrap());
        assert_eq!(light.reachability(), Reachability::Online);
        assert!(bulb.sent().is_empty());
        assert!(light.state().on());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_notifications_are_ignored() {
        let bulb = FakeBulb::color("d073d5000001");
        let (registry, light) = setup(&bulb).await;

        assert!(!registry.set_reachable(light.id(), true).await.unwrap());
        assert!(registry.set_reachable(light.id(), false).await.unwrap());
        assert!(!registry.set_reachable(light.id(), false).await.unwrap());
    }
}
