//! Property-based tests for room membership and history
//!
//! Random sequences of joins, leaves and posts are applied to a hub; after
//! every step each connection is in at most one room and the registry and
//! the rooms agree.

use gamechat::backend::auth::UserIdentity;
use gamechat::backend::chat::{ChatHub, Connection, OutboundFrame};
use gamechat::shared::ConnectionId;
use proptest::prelude::*;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
enum Op {
    Join { connection: usize, room: usize },
    Leave { connection: usize },
    Post { connection: usize },
    Disconnect { connection: usize },
}

fn op_strategy(connections: usize, rooms: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..connections, 0..rooms).prop_map(|(connection, room)| Op::Join { connection, room }),
        (0..connections).prop_map(|connection| Op::Leave { connection }),
        (0..connections).prop_map(|connection| Op::Post { connection }),
        (0..connections).prop_map(|connection| Op::Disconnect { connection }),
    ]
}

async fn check_membership(hub: &ChatHub, ids: &[ConnectionId]) {
    let rooms = hub.list_rooms().await;
    let mut listings = Vec::new();
    for summary in &rooms {
        let entries = hub
            .registry()
            .list_by_room(hub.directory(), summary.game_id)
            .await
            .unwrap();
        for entry in &entries {
            assert_eq!(entry.room_id, Some(summary.game_id));
        }
        listings.push(entries);
    }

    for id in ids {
        let listed = listings
            .iter()
            .filter(|entries| entries.iter().any(|entry| entry.connection.id == *id))
            .count();
        assert!(listed <= 1, "connection {} is listed in {} rooms", id, listed);

        let mut memberships = 0;
        for summary in &rooms {
            let room = hub.directory().get(summary.game_id).await.unwrap();
            if room.is_member(*id).await {
                memberships += 1;
                assert_eq!(hub.registry().room_of(*id).await.unwrap(), Some(summary.game_id));
            }
        }
        assert!(memberships <= 1, "connection {} is in {} rooms", id, memberships);
        if memberships == 0 {
            if let Ok(room) = hub.registry().room_of(*id).await {
                assert_eq!(room, None);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_at_most_one_room(ops in prop::collection::vec(op_strategy(4, 3), 1..40)) {
        tokio_test::block_on(async {
            let hub = ChatHub::new(5, 100);
            let owner = uuid::Uuid::new_v4();
            let mut rooms = Vec::new();
            for n in 0..3 {
                rooms.push(hub.create_room(Some(&format!("Room {}", n)), owner).await.unwrap());
            }

            let mut ids = Vec::new();
            let mut receivers = Vec::new();
            for n in 0..4 {
                let (tx, rx) = mpsc::channel::<OutboundFrame>(1024);
                let identity = UserIdentity { user_id: uuid::Uuid::new_v4(), display_name: format!("player{}", n) };
                let connection = hub.connect(Connection::new(ConnectionId::new(), identity, tx)).await.unwrap();
                ids.push(connection.id);
                receivers.push(rx);
            }

            for op in ops {
                match op {
                    Op::Join { connection, room } => {
                        let _ = hub.join_room(ids[connection], &rooms[room].id.to_string()).await;
                    }
                    Op::Leave { connection } => {
                        hub.leave_room(ids[connection]).await;
                    }
                    Op::Post { connection } => {
                        let _ = hub.post_message(ids[connection], "hello").await;
                    }
                    Op::Disconnect { connection } => {
                        hub.disconnect(ids[connection]).await;
                    }
                }
                check_membership(&hub, &ids).await;
                for room in &rooms {
                    assert!(room.history().await.len() <= 5);
                }
            }
        });
    }

    #[test]
    fn test_history_keeps_newest(count in 0usize..30, capacity in 1usize..10) {
        tokio_test::block_on(async {
            let hub = ChatHub::new(capacity, 100);
            let room = hub.create_room(Some("History"), uuid::Uuid::new_v4()).await.unwrap();
            let (tx, _rx) = mpsc::channel::<OutboundFrame>(1024);
            let identity = UserIdentity { user_id: uuid::Uuid::new_v4(), display_name: "poster".to_string() };
            let connection = hub.connect(Connection::new(ConnectionId::new(), identity, tx)).await.unwrap();
            hub.join_room(connection.id, &room.id.to_string()).await.unwrap();

            for n in 0..count {
                hub.post_message(connection.id, &format!("m{}", n)).await.unwrap();
            }

            let bodies: Vec<String> = hub
                .messages_for(connection.id)
                .await
                .unwrap()
                .into_iter()
                .map(|message| message.message)
                .collect();
            let expected: Vec<String> = (count.saturating_sub(capacity)..count).map(|n| format!("m{}", n)).collect();
            assert_eq!(bodies, expected);
        });
    }
}
