//! # End-to-End Route Flows
//!
//! Each test drives whole blocks through `begin_block`, `execute` and
//! `finalize_block` against in-memory stores.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_voting::{
        ParameterStore, ResolutionConfig, ResolutionHandler, ResolutionRegistry, ResolutionStore,
        UpdatePowerRequest, VotingResult, VALIDATOR_JOIN_EVENT_TYPE, VALIDATOR_REMOVE_EVENT_TYPE,
        START_MIGRATION_EVENT_TYPE,
    };
    use shared_types::{
        ApproveResolution, BlockContext, CreateResolution, MigrationStatus, NetworkParameters,
        Transfer, TxCode,
        U256, ValidatorApprove, ValidatorJoin, ValidatorLeave, ValidatorRemove,
        ValidatorVoteBodies, ValidatorVoteIds, VotableEvent,
    };

    use crate::integration::harness::{test_identity, TestChain, GENESIS_BALANCE};

    const TRANSFER_PRICE: u64 = 210_000;
    const APPROVE_PRICE: u64 = 10_000_000_000_000;
    const VOTE_ID_PRICE: u64 = 16_000;

    /// Accepts every resolution; stands in for an oracle-fed event type.
    struct AcceptDeposit;

    impl ResolutionHandler for AcceptDeposit {
        fn resolve(
            &self,
            _resolution: &qc_voting::Resolution,
            _state: &dyn qc_voting::VoteState,
            _block: &BlockContext,
        ) -> VotingResult<()> {
            Ok(())
        }
    }

    fn registry_with_deposits() -> ResolutionRegistry {
        let mut registry = ResolutionRegistry::with_defaults();
        registry
            .register("deposit", ResolutionConfig::new(100, Arc::new(AcceptDeposit)))
            .unwrap();
        registry
    }

    // =========================================================================
    // TRANSFERS
    // =========================================================================

    #[test]
    fn test_transfer_moves_amount_and_charges_fee() {
        let mut chain = TestChain::builder().funded(&[1]).build();
        let block = chain.begin(1);
        let receiver_before = chain.balance(2);

        let res = chain.submit(
            &block,
            1,
            &Transfer {
                to: test_identity(2),
                amount: "1000".to_string(),
            },
        );
        chain.finalize(&block);

        assert_eq!(res.code, TxCode::Ok);
        assert_eq!(res.spend, U256::from(TRANSFER_PRICE));
        assert_eq!(
            chain.balance(1),
            U256::from(GENESIS_BALANCE) - U256::from(1000u64) - U256::from(TRANSFER_PRICE)
        );
        assert_eq!(chain.balance(2), receiver_before + U256::from(1000u64));
    }

    #[test]
    fn test_transfer_rejects_malformed_amounts() {
        let chain = TestChain::builder().funded(&[1]).build();
        let block = chain.begin(1);

        for amount in ["-5", "1e3", "", "12abc"] {
            let res = chain.submit(
                &block,
                1,
                &Transfer {
                    to: test_identity(2),
                    amount: amount.to_string(),
                },
            );
            assert_eq!(res.code, TxCode::InvalidAmount, "amount {amount:?}");
        }
        assert!(chain.balance(2).is_zero());
    }

    // =========================================================================
    // VALIDATOR MEMBERSHIP
    // =========================================================================

    #[test]
    fn test_join_then_two_approvals_sets_power() {
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 1)
            .funded(&[1, 2, 9])
            .build();

        let block = chain.begin(1);
        assert!(chain.submit(&block, 9, &ValidatorJoin { power: 5 }).is_ok());
        let res = chain.submit(&block, 1, &ValidatorApprove { candidate: test_identity(9) });
        assert!(res.is_ok(), "{}", res.log);
        let outcome = chain.finalize(&block);
        assert!(outcome.finalized.is_empty());
        assert_eq!(chain.power(9), 0);

        let block = chain.begin(2);
        let res = chain.submit(&block, 2, &ValidatorApprove { candidate: test_identity(9) });
        assert!(res.is_ok(), "{}", res.log);
        let outcome = chain.finalize(&block);

        assert_eq!(outcome.finalized.len(), 1);
        assert_eq!(chain.power(9), 5);
        assert!(chain
            .state
            .votes()
            .resolutions_by_type(VALIDATOR_JOIN_EVENT_TYPE)
            .unwrap()
            .is_empty());
        assert_eq!(
            chain.balance(1),
            U256::from(GENESIS_BALANCE) - U256::from(APPROVE_PRICE) + U256::from(VOTE_ID_PRICE)
        );
    }

    #[test]
    fn test_self_approval_is_rejected_without_mutation() {
        let chain = TestChain::builder()
            .validator(1, 10)
            .funded(&[9])
            .build();
        let block = chain.begin(1);
        assert!(chain.submit(&block, 9, &ValidatorJoin { power: 5 }).is_ok());
        let before = chain
            .state
            .votes()
            .resolutions_by_type(VALIDATOR_JOIN_EVENT_TYPE)
            .unwrap();

        let res = chain.submit(&block, 9, &ValidatorApprove { candidate: test_identity(9) });

        assert_eq!(res.code, TxCode::InvalidSender);
        let after = chain
            .state
            .votes()
            .resolutions_by_type(VALIDATOR_JOIN_EVENT_TYPE)
            .unwrap();
        assert_eq!(before, after);
        assert!(after[0].voters.is_empty());
    }

    #[test]
    fn test_approve_without_join_request() {
        let chain = TestChain::builder().validator(1, 10).funded(&[1]).build();
        let block = chain.begin(1);

        let res = chain.submit(&block, 1, &ValidatorApprove { candidate: test_identity(9) });
        assert_eq!(res.code, TxCode::InvalidSender);
    }

    #[test]
    fn test_non_validator_cannot_approve() {
        let chain = TestChain::builder()
            .validator(1, 10)
            .funded(&[8, 9])
            .build();
        let block = chain.begin(1);
        assert!(chain.submit(&block, 9, &ValidatorJoin { power: 5 }).is_ok());

        let res = chain.submit(&block, 8, &ValidatorApprove { candidate: test_identity(9) });
        assert_eq!(res.code, TxCode::InvalidSender);
    }

    #[test]
    fn test_validator_cannot_join_again() {
        let chain = TestChain::builder().validator(1, 10).funded(&[1]).build();
        let block = chain.begin(1);

        let res = chain.submit(&block, 1, &ValidatorJoin { power: 20 });
        assert_eq!(res.code, TxCode::InvalidSender);
    }

    #[test]
    fn test_join_rejects_zero_and_oversized_power() {
        let chain = TestChain::builder().funded(&[9]).build();
        let block = chain.begin(1);

        for power in [0, u64::MAX] {
            let res = chain.submit(&block, 9, &ValidatorJoin { power });
            assert_eq!(res.code, TxCode::InvalidAmount, "power {power}");
        }
    }

    #[test]
    fn test_max_power_validator_keeps_quorum_working() {
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .funded(&[1, 8, 9])
            .build();

        let block = chain.begin(1);
        let max_power = i64::MAX as u64;
        assert!(chain.submit(&block, 9, &ValidatorJoin { power: max_power }).is_ok());
        assert!(chain
            .submit(&block, 1, &ValidatorApprove { candidate: test_identity(9) })
            .is_ok());
        chain.finalize(&block);
        assert_eq!(chain.power(9), i64::MAX);

        let block = chain.begin(1);
        assert!(chain.submit(&block, 8, &ValidatorJoin { power: 3 }).is_ok());
        for approver in [1, 9] {
            let res = chain.submit(&block, approver, &ValidatorApprove { candidate: test_identity(8) });
            assert!(res.is_ok(), "{}", res.log);
        }
        let outcome = chain.finalize(&block);

        assert_eq!(outcome.finalized.len(), 1);
        assert_eq!(chain.power(8), 3);
    }

    #[test]
    fn test_join_expiry_saturates_at_max_height() {
        let chain = TestChain::builder()
            .params(NetworkParameters {
                join_expiry: i64::MAX,
                ..NetworkParameters::default()
            })
            .validator(1, 10)
            .funded(&[9])
            .build();
        let block = chain.begin(1);

        let res = chain.submit(&block, 9, &ValidatorJoin { power: 5 });
        assert!(res.is_ok(), "{}", res.log);
        let pending = chain
            .state
            .votes()
            .resolutions_by_type(VALIDATOR_JOIN_EVENT_TYPE)
            .unwrap();
        assert_eq!(pending[0].expiry_height, i64::MAX);
    }

    #[test]
    fn test_duplicate_join_requests_are_an_internal_error() {
        let chain = TestChain::builder().validator(1, 10).funded(&[1]).build();
        let block = chain.begin(1);
        for power in [5, 6] {
            let request = UpdatePowerRequest {
                pub_key: test_identity(9),
                power,
            };
            let event = VotableEvent::new(VALIDATOR_JOIN_EVENT_TYPE, request.encode().unwrap());
            chain
                .state
                .votes()
                .create_resolution(&event, 100, &test_identity(9))
                .unwrap();
        }

        let res = chain.submit(&block, 1, &ValidatorApprove { candidate: test_identity(9) });

        assert_eq!(res.code, TxCode::UnknownError);
        let pending = chain
            .state
            .votes()
            .resolutions_by_type_and_proposer(VALIDATOR_JOIN_EVENT_TYPE, &test_identity(9))
            .unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|resolution| resolution.voters.is_empty()));
    }

    #[test]
    fn test_leave_twice() {
        let chain = TestChain::builder()
            .validator(1, 7)
            .validator(2, 10)
            .funded(&[1])
            .build();
        let block = chain.begin(2);

        let first = chain.submit(&block, 1, &ValidatorLeave);
        assert!(first.is_ok(), "{}", first.log);
        assert_eq!(chain.power(1), 0);

        let second = chain.submit(&block, 1, &ValidatorLeave);
        assert_eq!(second.code, TxCode::InvalidSender);
    }

    #[test]
    fn test_remove_accumulates_votes_on_one_resolution() {
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2])
            .build();
        let block = chain.begin(1);

        let remove = ValidatorRemove {
            validator: test_identity(3),
        };
        assert!(chain.submit(&block, 1, &remove).is_ok());
        assert!(chain.submit(&block, 2, &remove).is_ok());

        let pending = chain
            .state
            .votes()
            .resolutions_by_type(VALIDATOR_REMOVE_EVENT_TYPE)
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].approved_power, 20);

        let outcome = chain.finalize(&block);
        assert_eq!(outcome.finalized, vec![pending[0].id]);
        assert_eq!(chain.power(3), 0);
        assert!(!chain.state.votes().is_processed(&pending[0].id).unwrap());
    }

    #[test]
    fn test_remove_requires_validator_target() {
        let chain = TestChain::builder().validator(1, 10).funded(&[1]).build();
        let block = chain.begin(1);

        let res = chain.submit(
            &block,
            1,
            &ValidatorRemove {
                validator: test_identity(5),
            },
        );
        assert_eq!(res.code, TxCode::InvalidSender);
    }

    // =========================================================================
    // VOTES
    // =========================================================================

    #[test]
    fn test_vote_ids_drops_finalized_and_charges_full_batch() {
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2, 3])
            .registry(registry_with_deposits())
            .build();

        let first = VotableEvent::new("deposit", b"deposit-1".to_vec());
        let second = VotableEvent::new("deposit", b"deposit-2".to_vec());

        let block = chain.begin(1);
        let res = chain.submit(
            &block,
            1,
            &ValidatorVoteBodies {
                events: vec![first.clone(), second.clone()],
            },
        );
        assert!(res.is_ok(), "{}", res.log);
        let res = chain.submit(
            &block,
            2,
            &ValidatorVoteIds {
                resolution_ids: vec![first.id()],
            },
        );
        assert!(res.is_ok(), "{}", res.log);
        let outcome = chain.finalize(&block);
        assert_eq!(outcome.finalized, vec![first.id()]);

        let block = chain.begin(1);
        let res = chain.submit(
            &block,
            3,
            &ValidatorVoteIds {
                resolution_ids: vec![first.id(), second.id()],
            },
        );

        assert!(res.is_ok(), "{}", res.log);
        assert_eq!(res.spend, U256::from(2 * VOTE_ID_PRICE));
        assert!(chain.state.votes().is_processed(&first.id()).unwrap());
        assert!(!chain.state.votes().resolution_exists(&first.id()).unwrap());
        let pending = chain
            .state
            .votes()
            .resolution_by_id(&second.id())
            .unwrap()
            .unwrap();
        assert!(pending.has_voted(&test_identity(3)));
        assert_eq!(pending.approved_power, 20);
    }

    #[test]
    fn test_vote_bodies_only_from_proposer() {
        let chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .funded(&[2])
            .registry(registry_with_deposits())
            .build();
        let block = chain.begin(1);

        let res = chain.submit(
            &block,
            2,
            &ValidatorVoteBodies {
                events: vec![VotableEvent::new("deposit", vec![1, 2, 3])],
            },
        );
        assert_eq!(res.code, TxCode::InvalidSender);
    }

    #[test]
    fn test_vote_bodies_unknown_type() {
        let chain = TestChain::builder().validator(1, 10).funded(&[1]).build();
        let block = chain.begin(1);

        let res = chain.submit(
            &block,
            1,
            &ValidatorVoteBodies {
                events: vec![VotableEvent::new("withdrawal", vec![1])],
            },
        );
        assert_eq!(res.code, TxCode::InvalidResolutionType);
    }

    #[test]
    fn test_local_votes_evict_buffered_events() {
        let config = qc_txapp::TxAppConfig::default().with_local_identity(test_identity(2));
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2])
            .registry(registry_with_deposits())
            .config(config)
            .build();
        let event = VotableEvent::new("deposit", b"observed".to_vec());
        chain.state.votes().store_event(&event).unwrap();

        let block = chain.begin(1);
        assert!(chain
            .submit(&block, 1, &ValidatorVoteBodies { events: vec![event.clone()] })
            .is_ok());
        assert_eq!(chain.state.votes().local_events().unwrap(), vec![event.clone()]);

        let res = chain.submit(
            &block,
            2,
            &ValidatorVoteIds {
                resolution_ids: vec![event.id()],
            },
        );
        assert!(res.is_ok(), "{}", res.log);
        assert!(chain.state.votes().local_events().unwrap().is_empty());
        chain.finalize(&block);
    }

    // =========================================================================
    // GENERIC RESOLUTIONS AND MIGRATION
    // =========================================================================

    #[test]
    fn test_create_and_approve_generic_resolution() {
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2])
            .registry(registry_with_deposits())
            .build();
        let event = VotableEvent::new("deposit", b"bridge-42".to_vec());

        let block = chain.begin(1);
        let res = chain.submit(&block, 1, &CreateResolution { resolution: event.clone() });
        assert!(res.is_ok(), "{}", res.log);
        assert_eq!(res.spend, U256::from(9_000u64));

        let res = chain.submit(&block, 2, &ApproveResolution { resolution_id: event.id() });
        assert!(res.is_ok(), "{}", res.log);

        let outcome = chain.finalize(&block);
        assert_eq!(outcome.finalized, vec![event.id()]);
        assert!(chain.state.votes().is_processed(&event.id()).unwrap());
    }

    #[test]
    fn test_approve_missing_resolution() {
        let chain = TestChain::builder().validator(1, 10).funded(&[1]).build();
        let block = chain.begin(1);

        let missing = VotableEvent::new("deposit", vec![9]).id();
        let res = chain.submit(&block, 1, &ApproveResolution { resolution_id: missing });
        assert_eq!(res.code, TxCode::InvalidResolutionType);
    }

    #[test]
    fn test_migration_proposal_lifecycle() {
        let mut chain = TestChain::builder()
            .validator(1, 10)
            .validator(2, 10)
            .validator(3, 10)
            .funded(&[1, 2, 3])
            .build();
        let proposal = VotableEvent::new(START_MIGRATION_EVENT_TYPE, b"v2-at-1000".to_vec());

        let block = chain.begin(1);
        assert!(chain
            .submit(&block, 1, &CreateResolution { resolution: proposal.clone() })
            .is_ok());
        assert!(chain
            .submit(&block, 2, &ApproveResolution { resolution_id: proposal.id() })
            .is_ok());
        chain.finalize(&block);

        assert_eq!(
            chain
                .state
                .votes()
                .network_parameters()
                .unwrap()
                .migration_status,
            MigrationStatus::ActivationPeriod
        );

        let block = chain.begin(1);
        assert_eq!(block.params.migration_status, MigrationStatus::ActivationPeriod);
        let res = chain.submit(
            &block,
            3,
            &Transfer {
                to: test_identity(4),
                amount: "1".to_string(),
            },
        );
        assert!(res.is_ok(), "transfers continue during activation: {}", res.log);

        let competing = VotableEvent::new(START_MIGRATION_EVENT_TYPE, b"v3".to_vec());
        let res = chain.submit(&block, 3, &CreateResolution { resolution: competing });
        assert_eq!(res.code, TxCode::NetworkInMigration);
        chain.finalize(&block);

        chain
            .state
            .votes()
            .set_migration_status(MigrationStatus::MigrationInProgress)
            .unwrap();
        let block = chain.begin(1);
        let res = chain.submit(
            &block,
            3,
            &Transfer {
                to: test_identity(4),
                amount: "1".to_string(),
            },
        );
        assert_eq!(res.code, TxCode::NetworkInMigration);
        assert_eq!(res.spend, U256::from(TRANSFER_PRICE));
    }
}
