//! Integration tests for the table actor.
//!
//! These drive a spawned actor through its handle the way a transport
//! would: serialized commands with oneshot acks, and per-client snapshot
//! subscriptions.

use nl_holdem::game::entities::{
    Action, Card, ClientId, Deck, FixedDeckSource, HandPhase,
    Suit::{Diamond, Heart},
};
use nl_holdem::game::{SeatCards, TableError, TableView};
use nl_holdem::table::{TableActor, TableCommand, TableConfig, TableEvent, TableHandle};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};

struct Connection {
    client: ClientId,
    events: mpsc::Receiver<TableEvent>,
}

impl Connection {
    /// Connect a client and swallow the initial snapshot.
    async fn open(handle: &TableHandle, client: ClientId) -> Self {
        let (tx, rx) = mpsc::channel(64);
        handle
            .send(TableCommand::Connect {
                client,
                subscriber: tx,
            })
            .await
            .unwrap();
        let mut conn = Self { client, events: rx };
        conn.next_view().await;
        conn
    }

    async fn next_view(&mut self) -> TableView {
        let event = timeout(Duration::from_secs(2), self.events.recv())
            .await
            .expect("timed out waiting for a snapshot")
            .expect("event channel closed");
        let TableEvent::State(view) = event;
        view
    }

    async fn latest_view(&mut self) -> TableView {
        let mut view = self.next_view().await;
        while let Ok(event) = self.events.try_recv() {
            let TableEvent::State(newer) = event;
            view = newer;
        }
        view
    }
}

async fn command(
    handle: &TableHandle,
    build: impl FnOnce(oneshot::Sender<Result<(), TableError>>) -> TableCommand,
) -> Result<(), TableError> {
    let (ack, rx) = oneshot::channel();
    handle.send(build(ack)).await.unwrap();
    rx.await.unwrap()
}

async fn seat_player(handle: &TableHandle, conn: &Connection, seat: usize, name: &str) {
    command(handle, |ack| TableCommand::SetUsername {
        client: conn.client,
        name: name.into(),
        ack,
    })
    .await
    .unwrap();
    command(handle, |ack| TableCommand::Sit {
        client: conn.client,
        seat,
        buy_in: 500,
        ack,
    })
    .await
    .unwrap();
}

fn spawn_default() -> TableHandle {
    let (actor, handle) = TableActor::new(TableConfig::default());
    tokio::spawn(actor.run());
    handle
}

#[tokio::test]
async fn test_acks_carry_error_tags() {
    let handle = spawn_default();
    let conn = Connection::open(&handle, 1).await;

    // Sitting without a username is rejected and changes nothing.
    let result = command(&handle, |ack| TableCommand::Sit {
        client: conn.client,
        seat: 0,
        buy_in: 500,
        ack,
    })
    .await;
    assert_eq!(result, Err(TableError::NoUsername));
    assert_eq!(result.unwrap_err().to_string(), "no-username");

    let result = command(&handle, |ack| TableCommand::StartHand {
        client: conn.client,
        ack,
    })
    .await;
    assert_eq!(result, Err(TableError::NotOwner));
}

#[tokio::test]
async fn test_successful_commands_broadcast_to_all_subscribers() {
    let handle = spawn_default();
    let mut alice = Connection::open(&handle, 1).await;
    let mut bob = Connection::open(&handle, 2).await;

    seat_player(&handle, &alice, 0, "alice").await;

    // Both clients observe the new seat in their own snapshots.
    let alice_view = alice.latest_view().await;
    let bob_view = bob.latest_view().await;
    for view in [&alice_view, &bob_view] {
        let seat = view.seats[0].as_ref().unwrap();
        assert_eq!(seat.name.as_str(), "alice");
        assert_eq!(seat.stack, 500);
    }
}

#[tokio::test]
async fn test_snapshots_are_projected_per_viewer() {
    // Rig a deck so the test is deterministic end to end.
    let draws = vec![
        Card(13, Heart),
        Card(12, Heart), // seat 1
        Card(14, Heart),
        Card(14, Diamond), // seat 0
    ];
    let mut cards = draws.clone();
    cards.reverse();
    let source = FixedDeckSource::new(vec![Deck::from_cards(cards)]);
    let (actor, handle) = TableActor::with_deck_source(TableConfig::default(), Box::new(source));
    tokio::spawn(actor.run());

    let mut alice = Connection::open(&handle, 1).await;
    let mut bob = Connection::open(&handle, 2).await;
    seat_player(&handle, &alice, 0, "alice").await;
    seat_player(&handle, &bob, 1, "bob").await;
    command(&handle, |ack| TableCommand::ClaimOwner { client: 1, ack })
        .await
        .unwrap();
    command(&handle, |ack| TableCommand::StartHand { client: 1, ack })
        .await
        .unwrap();

    let alice_view = alice.latest_view().await;
    assert_eq!(alice_view.phase, HandPhase::Preflop);
    assert_eq!(
        alice_view.seats[0].as_ref().unwrap().hole,
        Some(SeatCards::Revealed([Card(14, Heart), Card(14, Diamond)]))
    );
    assert_eq!(
        alice_view.seats[1].as_ref().unwrap().hole,
        Some(SeatCards::Hidden)
    );

    let bob_view = bob.latest_view().await;
    assert_eq!(
        bob_view.seats[0].as_ref().unwrap().hole,
        Some(SeatCards::Hidden)
    );
    assert!(matches!(
        bob_view.seats[1].as_ref().unwrap().hole,
        Some(SeatCards::Revealed(_))
    ));
}

#[tokio::test]
async fn test_showdown_timer_returns_table_to_idle() {
    let config = TableConfig {
        showdown_pause_ms: 50,
        ..TableConfig::default()
    };
    let (actor, handle) = TableActor::new(config);
    tokio::spawn(actor.run());

    let mut alice = Connection::open(&handle, 1).await;
    let bob = Connection::open(&handle, 2).await;
    seat_player(&handle, &alice, 0, "alice").await;
    seat_player(&handle, &bob, 1, "bob").await;
    command(&handle, |ack| TableCommand::ClaimOwner { client: 1, ack })
        .await
        .unwrap();
    command(&handle, |ack| TableCommand::StartHand { client: 1, ack })
        .await
        .unwrap();

    // Heads-up: seat 1 is the small blind and acts first; folding ends the
    // hand immediately.
    command(&handle, |ack| TableCommand::TakeAction {
        client: 2,
        action: Action::Fold,
        ack,
    })
    .await
    .unwrap();

    // While the pause is pending, no new hand can start.
    let result = command(&handle, |ack| TableCommand::StartHand { client: 1, ack }).await;
    assert_eq!(result, Err(TableError::HandInProgress));

    // The timer fires as a serialized command and broadcasts the idle state.
    let mut view = alice.latest_view().await;
    while view.phase != HandPhase::Idle {
        view = alice.next_view().await;
    }
    assert_eq!(view.pot_total, 0);

    let result = command(&handle, |ack| TableCommand::StartHand { client: 1, ack }).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_disconnect_frees_seat_and_owner_role() {
    let handle = spawn_default();
    let alice = Connection::open(&handle, 1).await;
    let mut bob = Connection::open(&handle, 2).await;
    seat_player(&handle, &alice, 0, "alice").await;
    seat_player(&handle, &bob, 1, "bob").await;
    command(&handle, |ack| TableCommand::ClaimOwner { client: 1, ack })
        .await
        .unwrap();

    handle
        .send(TableCommand::Disconnect { client: 1 })
        .await
        .unwrap();

    let mut view = bob.latest_view().await;
    while view.seats[0].is_some() || view.owner_present {
        view = bob.next_view().await;
    }
    assert!(view.seats[0].is_none());
    assert!(!view.owner_present);
}

#[tokio::test]
async fn test_commands_from_one_client_apply_in_order() {
    let handle = spawn_default();
    let conn = Connection::open(&handle, 1).await;

    // Fire a burst without awaiting acks in between; the actor must apply
    // them in submission order.
    let (a1, r1) = oneshot::channel();
    let (a2, r2) = oneshot::channel();
    let (a3, r3) = oneshot::channel();
    handle
        .send(TableCommand::SetUsername {
            client: conn.client,
            name: "alice".into(),
            ack: a1,
        })
        .await
        .unwrap();
    handle
        .send(TableCommand::Sit {
            client: conn.client,
            seat: 0,
            buy_in: 500,
            ack: a2,
        })
        .await
        .unwrap();
    handle
        .send(TableCommand::Stand {
            client: conn.client,
            ack: a3,
        })
        .await
        .unwrap();

    assert!(r1.await.unwrap().is_ok());
    assert!(r2.await.unwrap().is_ok());
    assert!(r3.await.unwrap().is_ok());
}
