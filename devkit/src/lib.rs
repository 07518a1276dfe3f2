/*!
# Folio DevKit - Stubs et Utilitaires pour Tests

Bibliothèque facilitant le test du dashboard avec:
- Stub HTTP de l'endpoint /api/health (réponses scriptées)
- Builders de snapshots JSON
- Helpers d'attente pour tests asynchrones
*/

pub mod health_stub;
pub mod test_utils;

pub use health_stub::{HealthStub, StubReply};
pub use test_utils::{wait_until, SnapshotBuilder};
