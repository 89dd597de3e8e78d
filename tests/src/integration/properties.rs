//! # Dispatcher and Resolution Properties
//!
//! - rejected transactions never reach `apply`
//! - identical events map to one resolution; approvals are a set
//! - the migration gate covers every route
//! - a candidate has at most one pending join request
//! - fees and transfers conserve the token supply

#[cfg(test)]
mod tests {
    use qc_txapp::TxResponse;
    use qc_voting::{ParameterStore, ResolutionStore, VALIDATOR_JOIN_EVENT_TYPE};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::{
        ApproveResolution, BlockContext, CreateResolution, MigrationStatus, NetworkParameters,
        PayloadType, Transfer, TxCode, U256, ValidatorApprove, ValidatorJoin, ValidatorLeave,
        ValidatorRemove, ValidatorVoteBodies, ValidatorVoteIds, VotableEvent,
    };

    use crate::integration::harness::{test_identity, TestChain, GENESIS_BALANCE};

    const START_MIGRATION: &str = qc_voting::START_MIGRATION_EVENT_TYPE;

    /// Submit one transaction of every payload type from `sender`.
    fn submit_every_route(
        chain: &TestChain,
        block: &BlockContext,
        sender: u8,
    ) -> Vec<(PayloadType, TxResponse)> {
        let event = VotableEvent::new(START_MIGRATION, b"gate".to_vec());
        vec![
            (
                PayloadType::Transfer,
                chain.submit(
                    block,
                    sender,
                    &Transfer {
                        to: test_identity(50),
                        amount: "10".to_string(),
                    },
                ),
            ),
            (
                PayloadType::ValidatorJoin,
                chain.submit(block, 60, &ValidatorJoin { power: 1 }),
            ),
            (
                PayloadType::ValidatorApprove,
                chain.submit(block, sender, &ValidatorApprove { candidate: test_identity(60) }),
            ),
            (
                PayloadType::ValidatorRemove,
                chain.submit(block, sender, &ValidatorRemove { validator: test_identity(2) }),
            ),
            (
                PayloadType::ValidatorLeave,
                chain.submit(block, sender, &ValidatorLeave),
            ),
            (
                PayloadType::ValidatorVoteIds,
                chain.submit(block, sender, &ValidatorVoteIds { resolution_ids: vec![event.id()] }),
            ),
            (
                PayloadType::ValidatorVoteBodies,
                chain.submit(block, sender, &ValidatorVoteBodies { events: vec![event.clone()] }),
            ),
            (
                PayloadType::CreateResolution,
                chain.submit(block, sender, &CreateResolution { resolution: event.clone() }),
            ),
            (
                PayloadType::ApproveResolution,
                chain.submit(block, sender, &ApproveResolution { resolution_id: event.id() }),
            ),
        ]
    }

    #[test]
    fn test_migration_gate_covers_every_route() {
        for status in [
            MigrationStatus::MigrationInProgress,
            MigrationStatus::MigrationCompleted,
        ] {
            let chain = TestChain::builder()
                .params(NetworkParameters {
                    migration_status: status,
                    ..NetworkParameters::default()
                })
                .validator(1, 10)
                .validator(2, 10)
                .funded(&[1, 60])
                .build();
            let block = chain.begin(1);

            let responses = submit_every_route(&chain, &block, 1);
            assert_eq!(responses.len(), PayloadType::ALL.len());
            for (payload_type, res) in responses {
                assert_eq!(
                    res.code,
                    TxCode::NetworkInMigration,
                    "{payload_type} under {status}"
                );
            }

            assert_eq!(chain.power(1), 10);
            assert_eq!(chain.power(2), 10);
            assert!(chain.balance(50).is_zero());
            assert!(chain
                .state
                .votes()
                .resolutions_by_type(VALIDATOR_JOIN_EVENT_TYPE)
                .unwrap()
                .is_empty());
            assert!(chain
                .state
                .votes()
                .resolutions_by_type(START_MIGRATION)
                .unwrap()
                .is_empty());
        }
    }

    #[test]
    fn test_activation_period_does_not_gate_routes() {
        let chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .funded(&[1, 60])
            .build();
        chain
            .state
            .votes()
            .set_migration_status(MigrationStatus::ActivationPeriod)
            .unwrap();
        let block = chain.begin(1);

        for (payload_type, res) in submit_every_route(&chain, &block, 1) {
            let expect_gate = payload_type == PayloadType::CreateResolution;
            assert_eq!(
                res.code == TxCode::NetworkInMigration,
                expect_gate,
                "{payload_type}: {}",
                res.log
            );
        }
    }

    #[test]
    fn test_identical_events_share_one_resolution() {
        let chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2])
            .build();
        let block = chain.begin(1);
        let event = VotableEvent::new(START_MIGRATION, b"v2".to_vec());

        let first = chain.submit(&block, 1, &CreateResolution { resolution: event.clone() });
        assert!(first.is_ok(), "{}", first.log);

        let again = VotableEvent::new(START_MIGRATION, b"v2".to_vec());
        assert_eq!(again.id(), event.id());
        let second = chain.submit(&block, 2, &CreateResolution { resolution: again });
        assert!(!second.is_ok());

        let stored = chain
            .state
            .votes()
            .resolution_by_id(&event.id())
            .unwrap()
            .unwrap();
        assert_eq!(stored.proposer, test_identity(1));
        assert!(!stored.has_voted(&test_identity(2)));

        let other = VotableEvent::new(START_MIGRATION, b"v3".to_vec());
        assert_ne!(other.id(), event.id());
    }

    #[test]
    fn test_double_approval_counts_once() {
        let chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2])
            .build();
        let block = chain.begin(1);
        let event = VotableEvent::new(START_MIGRATION, b"v2".to_vec());
        assert!(chain
            .submit(&block, 1, &CreateResolution { resolution: event.clone() })
            .is_ok());

        let approve = ApproveResolution {
            resolution_id: event.id(),
        };
        assert!(chain.submit(&block, 2, &approve).is_ok());
        let once = chain.state.votes().resolution_by_id(&event.id()).unwrap().unwrap();
        assert!(chain.submit(&block, 2, &approve).is_ok());
        let twice = chain.state.votes().resolution_by_id(&event.id()).unwrap().unwrap();

        assert_eq!(once.approved_power, 20);
        assert_eq!(twice.approved_power, once.approved_power);
        assert_eq!(twice.voters, once.voters);
    }

    #[test]
    fn test_single_pending_join_per_candidate() {
        let chain = TestChain::builder().validator(1, 10).funded(&[9]).build();
        let block = chain.begin(1);

        assert!(chain.submit(&block, 9, &ValidatorJoin { power: 5 }).is_ok());
        let res = chain.submit(&block, 9, &ValidatorJoin { power: 6 });

        assert_eq!(res.code, TxCode::InvalidSender);
        let pending = chain
            .state
            .votes()
            .resolutions_by_type_and_proposer(VALIDATOR_JOIN_EVENT_TYPE, &test_identity(9))
            .unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_random_transfers_conserve_supply() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let accounts: [u8; 4] = [1, 2, 3, 4];
        let chain = TestChain::builder().funded(&accounts).build();
        let block = chain.begin(1);
        let supply = U256::from(GENESIS_BALANCE) * U256::from(accounts.len());

        let mut spent = U256::zero();
        for _ in 0..200 {
            let from = accounts[rng.gen_range(0..accounts.len())];
            let to = accounts[rng.gen_range(0..accounts.len())];
            let amount = match rng.gen_range(0..10) {
                0 => "-1".to_string(),
                1 => GENESIS_BALANCE.saturating_mul(2).to_string(),
                _ => rng.gen_range(0..GENESIS_BALANCE / 100).to_string(),
            };

            let mut tx = chain.tx(
                &block,
                from,
                &Transfer {
                    to: test_identity(to),
                    amount,
                },
            );
            if rng.gen_bool(0.1) {
                tx.body.fee = U256::from(rng.gen_range(0..210_000u64));
            }
            if rng.gen_bool(0.05) {
                tx.body.nonce += 1;
            }

            let res = chain.deliver(&block, &tx);
            if res.code == TxCode::InvalidNonce {
                assert!(res.spend.is_zero());
            }
            spent += res.spend;
        }

        let remaining = accounts
            .iter()
            .fold(U256::zero(), |total, n| total + chain.balance(*n));
        assert_eq!(remaining + spent, supply);
    }
}
