//! Dispatcher — turns one request into exactly one response.
//!
//! Pipeline: decode → resolve entity → resolve command → execute.
//! An unknown command is reported as such even when the entity is unknown
//! too; the entity lookup only matters once the command is known to need one.
//! Every failure becomes an error [`Response`]; nothing escapes to the
//! transport.

use std::sync::Arc;

use gpiohub_domain::error::CommandError;
use gpiohub_domain::protocol::{Request, Response};

use crate::commands::{CommandContext, CommandTable};
use crate::pin::PinBank;
use crate::ports::PinAccess;
use crate::registry::EntityRegistry;

/// Request handling pipeline over the shared pin/entity/command tables.
pub struct Dispatcher<A> {
    pins: Arc<PinBank<A>>,
    entities: Arc<EntityRegistry>,
    commands: Arc<CommandTable>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            pins: Arc::clone(&self.pins),
            entities: Arc::clone(&self.entities),
            commands: Arc::clone(&self.commands),
        }
    }
}

impl<A: PinAccess> Dispatcher<A> {
    /// Create a dispatcher over already-initialized tables.
    pub fn new(
        pins: Arc<PinBank<A>>,
        entities: Arc<EntityRegistry>,
        commands: Arc<CommandTable>,
    ) -> Self {
        Self {
            pins,
            entities,
            commands,
        }
    }

    /// Handle a raw datagram payload.
    pub async fn dispatch(&self, payload: &[u8]) -> Response {
        match Request::decode(payload) {
            Ok(request) => self.handle(request).await,
            Err(err) => {
                tracing::debug!(%err, bytes = payload.len(), "rejected malformed request");
                err.into()
            }
        }
    }

    /// Handle a decoded request.
    #[tracing::instrument(
        skip(self, request),
        fields(command = %request.command, entity = %request.entity_name)
    )]
    pub async fn handle(&self, request: Request) -> Response {
        match self.execute(&request).await {
            Ok(response) => {
                tracing::debug!(data = %response.data, "request handled");
                response
            }
            Err(CommandError::Internal(err)) => {
                tracing::warn!(error = ?err, "request failed");
                CommandError::Internal(err).into()
            }
            Err(err) => {
                tracing::debug!(%err, "request refused");
                err.into()
            }
        }
    }

    async fn execute(&self, request: &Request) -> Result<Response, CommandError> {
        let entity = self.entities.find_by_name(&request.entity_name);

        let command = self
            .commands
            .resolve(&request.command)
            .ok_or(CommandError::InvalidCommand)?;

        let entity = if command.requires_entity() {
            Some(entity.ok_or(CommandError::InvalidEntity)?)
        } else {
            None
        };

        let ctx = CommandContext {
            pins: &self.pins,
            entities: &self.entities,
        };
        command.kind().execute(&ctx, entity, &request.args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakePins, PinCall};
    use gpiohub_domain::board::BoardRevision;
    use gpiohub_domain::entity::{Entity, EntityKind};
    use gpiohub_domain::pin::Level;

    async fn make_dispatcher() -> (Arc<FakePins>, Dispatcher<FakePins>) {
        let fake = Arc::new(FakePins::default());
        let pins = PinBank::with_shared_access(BoardRevision::default(), Arc::clone(&fake));
        let entities = EntityRegistry::new(
            vec![
                Entity::builder()
                    .name("lamp")
                    .friendly_name("Lamp")
                    .pin(5)
                    .kind(EntityKind::Output)
                    .build()
                    .unwrap(),
                Entity::builder()
                    .name("btn")
                    .pin(6)
                    .kind(EntityKind::Input)
                    .build()
                    .unwrap(),
            ],
            pins.len(),
        )
        .unwrap();
        pins.initialize(&entities).await.unwrap();
        fake.clear_calls();

        let dispatcher = Dispatcher::new(
            Arc::new(pins),
            Arc::new(entities),
            Arc::new(CommandTable::with_builtins()),
        );
        (fake, dispatcher)
    }

    async fn send(dispatcher: &Dispatcher<FakePins>, payload: &str) -> Response {
        dispatcher.dispatch(payload.as_bytes()).await
    }

    #[tokio::test]
    async fn should_reject_malformed_payload() {
        let (_, dispatcher) = make_dispatcher().await;

        for payload in ["", "not json", "[]", r#"{"EntityName":"lamp"}"#, "{\"Command\":"] {
            assert_eq!(
                send(&dispatcher, payload).await,
                Response::error("invalid request format"),
                "payload {payload:?}"
            );
        }
    }

    #[tokio::test]
    async fn should_report_unknown_command_before_unknown_entity() {
        let (_, dispatcher) = make_dispatcher().await;

        for entity in ["lamp", "ghost", ""] {
            let payload = format!(r#"{{"Command":"explode","EntityName":"{entity}"}}"#);
            assert_eq!(
                send(&dispatcher, &payload).await,
                Response::error("invalid command")
            );
        }
    }

    #[tokio::test]
    async fn should_report_unknown_entity_for_entity_commands() {
        let (fake, dispatcher) = make_dispatcher().await;

        for command in ["state", "direction", "toggle"] {
            let payload = format!(r#"{{"Command":"{command}","EntityName":"ghost","Args":[]}}"#);
            assert_eq!(
                send(&dispatcher, &payload).await,
                Response::error("invalid entity")
            );
        }
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_entity_name_for_entityless_commands() {
        let (_, dispatcher) = make_dispatcher().await;

        let bare = send(&dispatcher, r#"{"Command":"list"}"#).await;
        let garbage = send(&dispatcher, r#"{"Command":"list","EntityName":"ghost"}"#).await;
        let valid = send(&dispatcher, r#"{"Command":"LIST","EntityName":"lamp"}"#).await;

        assert!(bare.is_ok());
        assert_eq!(bare, garbage);
        assert_eq!(bare, valid);
    }

    #[tokio::test]
    async fn should_round_trip_state_on_output() {
        let (fake, dispatcher) = make_dispatcher().await;

        let write = send(
            &dispatcher,
            r#"{"Command":"state","EntityName":"lamp","Args":["1"]}"#,
        )
        .await;
        assert_eq!(write, Response::ok("1"));
        assert_eq!(fake.level(5), Level::High);

        let read = send(
            &dispatcher,
            r#"{"Command":"state","EntityName":"lamp","Args":[]}"#,
        )
        .await;
        assert_eq!(read, Response::ok("1"));
    }

    #[tokio::test]
    async fn should_return_same_state_on_repeated_reads() {
        let (fake, dispatcher) = make_dispatcher().await;
        fake.set_level(6, Level::High);

        let first = send(&dispatcher, r#"{"Command":"state","EntityName":"btn"}"#).await;
        let second = send(&dispatcher, r#"{"Command":"state","EntityName":"btn"}"#).await;
        assert_eq!(first, Response::ok("1"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn should_restore_level_after_two_toggles() {
        let (fake, dispatcher) = make_dispatcher().await;
        let original = fake.level(5);

        send(&dispatcher, r#"{"Command":"toggle","EntityName":"lamp"}"#).await;
        send(&dispatcher, r#"{"Command":"toggle","EntityName":"lamp"}"#).await;

        assert_eq!(fake.level(5), original);
    }

    #[tokio::test]
    async fn should_refuse_write_to_input_without_touching_hardware() {
        let (fake, dispatcher) = make_dispatcher().await;

        let resp = send(
            &dispatcher,
            r#"{"Command":"state","EntityName":"btn","Args":["1"]}"#,
        )
        .await;
        assert_eq!(resp, Response::error("entity is input"));
        assert!(fake.writes().is_empty());
    }

    #[tokio::test]
    async fn should_resolve_entity_names_case_sensitively() {
        let (_, dispatcher) = make_dispatcher().await;

        let resp = send(&dispatcher, r#"{"Command":"direction","EntityName":"LAMP"}"#).await;
        assert_eq!(resp, Response::error("invalid entity"));
    }

    #[tokio::test]
    async fn should_keep_serving_after_hardware_failure() {
        let (fake, dispatcher) = make_dispatcher().await;
        fake.break_pin(5);

        let failed = send(&dispatcher, r#"{"Command":"state","EntityName":"lamp"}"#).await;
        assert_eq!(failed, Response::error("internal error"));

        let next = send(&dispatcher, r#"{"Command":"direction","EntityName":"lamp"}"#).await;
        assert_eq!(next, Response::ok("output"));
    }

    #[tokio::test]
    async fn should_keep_serving_after_failed_write() {
        let (fake, dispatcher) = make_dispatcher().await;
        fake.break_writes(5);

        let failed = send(
            &dispatcher,
            r#"{"Command":"state","EntityName":"lamp","Args":["1"]}"#,
        )
        .await;
        assert_eq!(failed, Response::error("internal error"));

        let toggled = send(&dispatcher, r#"{"Command":"toggle","EntityName":"lamp"}"#).await;
        assert_eq!(toggled, Response::error("internal error"));

        let read = send(&dispatcher, r#"{"Command":"state","EntityName":"lamp"}"#).await;
        assert_eq!(read, Response::ok("0"));
    }

    #[tokio::test]
    async fn should_accept_null_fields_from_go_style_clients() {
        let (_, dispatcher) = make_dispatcher().await;

        let listed = send(
            &dispatcher,
            r#"{"Command":"list","EntityName":null,"Args":null}"#,
        )
        .await;
        assert!(listed.is_ok());

        let read = send(
            &dispatcher,
            r#"{"command":"direction","entityName":"lamp","args":null}"#,
        )
        .await;
        assert_eq!(read, Response::ok("output"));
    }

    #[tokio::test]
    async fn should_serve_from_cloned_handles() {
        let (fake, dispatcher) = make_dispatcher().await;
        let clone = dispatcher.clone();

        send(&clone, r#"{"Command":"state","EntityName":"lamp","Args":["1"]}"#).await;
        assert_eq!(fake.writes(), vec![PinCall::Write(5, Level::High)]);
    }
}
