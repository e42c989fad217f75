#[must_use]
pub fn help_text(command: Option<&str>) -> String {
    match command {
        Some("connect") => {
            "connect\n  Request accounts and the chain ID from the wallet.\n  Uses the first account the wallet returns.".to_string()
        }
        Some("status") => {
            "status\n  Show connection state, chain ID, active account and busy flag.".to_string()
        }
        Some("result") | Some("res") => {
            "result\n  Show the latest result: a read value, a receipt lookup command,\n  a signature split or a mined receipt.\n  Alias: res".to_string()
        }
        Some("name") => "name\n  Show the staking contract's name.".to_string(),
        Some("symbol") => "symbol\n  Show the staking token symbol.".to_string(),
        Some("decimals") => "decimals\n  Show the staking token decimals.".to_string(),
        Some("delegated_validators") | Some("validators") => {
            "delegated_validators [delegator]\n  List validators the delegator has stake with.\n  Default delegator: the connected account.\n  Alias: validators".to_string()
        }
        Some("delegation_of") | Some("delegation") => {
            "delegation_of <validator> [delegator]\n  Show the amount delegated to one validator.\n  Default delegator: the connected account.\n  Alias: delegation".to_string()
        }
        Some("total_delegation_of") | Some("total_delegation") => {
            "total_delegation_of [delegator]\n  Show the amount delegated across all validators.\n  Alias: total_delegation".to_string()
        }
        Some("reward_of") | Some("reward") => {
            "reward_of <validator> [delegator]\n  Show the pending reward from one validator.\n  Alias: reward".to_string()
        }
        Some("rewards_of") | Some("rewards") => {
            "rewards_of [delegator]\n  Show pending rewards from all validators.\n  Alias: rewards".to_string()
        }
        Some("balance_of") | Some("balance") | Some("bal") => {
            "balance_of [account]\n  Show the staking token balance.\n  Default account: the connected account.\n  Aliases: balance, bal".to_string()
        }
        Some("delegate") => {
            "delegate <validator> <amount>\n  Delegate tokens to a validator.\n  Amount is in token units (e.g. '1.5').\n  The receipt is polled in the background.".to_string()
        }
        Some("undelegate") => {
            "undelegate <validator> <amount>\n  Undelegate tokens from a validator.\n  Amount is in token units (e.g. '1.5').".to_string()
        }
        Some("redelegate") => {
            "redelegate <src_validator> <dst_validator> <amount>\n  Move delegated tokens between validators.\n  Disabled unless enable_redelegate is set in the config\n  or --enable-redelegate is passed.".to_string()
        }
        Some("withdraw_reward") => {
            "withdraw_reward <validator>\n  Claim the pending reward from one validator.".to_string()
        }
        Some("withdraw_rewards") | Some("withdraw") => {
            "withdraw_rewards\n  Claim pending rewards from all validators.\n  Alias: withdraw".to_string()
        }
        Some("delegate_typed") | Some("sign_typed") => {
            "delegate_typed\n  Ask the wallet to sign the demo Staking message (EIP-712)\n  and show the signature split into r, s and v.\n  Alias: sign_typed".to_string()
        }
        Some("verify_typed") | Some("verify") => {
            "verify_typed <signature>\n  Recover the signer of a demo Staking message signature\n  and compare it with the connected account.\n  Alias: verify".to_string()
        }
        Some("delegate_by_message") | Some("delegate_signed") => {
            "delegate_by_message <validator_bech32> <amount>\n  Sign a DelegateMessage (EIP-712) for the chain's domain and\n  submit it with delegateByMessage. The validator is the bech32\n  operator address; the denom comes from the config.\n  Alias: delegate_signed".to_string()
        }
        Some("receipt") | Some("tx") => {
            "receipt <tx_hash>\n  Poll the node for a transaction receipt.\n  The receipt is shown once mined.\n  Alias: tx".to_string()
        }
        Some("exit") | Some("quit") | Some("q") => {
            "exit\n  Exit the client.\n  Aliases: quit, q".to_string()
        }
        Some(other) => format!("Unknown command: '{other}'. Type 'help' for a list."),
        None => {
            "Available commands:\n\
             \n\
             \x20 connect               Connect the wallet\n\
             \x20 status                Show connection state\n\
             \x20 result                Show the latest result\n\
             \x20 name                  Contract name\n\
             \x20 symbol                Token symbol\n\
             \x20 decimals              Token decimals\n\
             \x20 delegated_validators  Validators with stake\n\
             \x20 delegation_of         Stake with one validator\n\
             \x20 total_delegation_of   Stake across all validators\n\
             \x20 reward_of             Reward from one validator\n\
             \x20 rewards_of            Rewards from all validators\n\
             \x20 balance_of            Token balance\n\
             \x20 delegate              Delegate to a validator\n\
             \x20 undelegate            Undelegate from a validator\n\
             \x20 redelegate            Move stake between validators\n\
             \x20 withdraw_reward       Claim one validator's reward\n\
             \x20 withdraw_rewards      Claim all rewards\n\
             \x20 delegate_by_message   Delegate with a signed message\n\
             \x20 delegate_typed        Sign a demo staking message\n\
             \x20 verify_typed          Verify a demo message signature\n\
             \x20 receipt               Poll for a transaction receipt\n\
             \x20 help [cmd]            Show help for a command\n\
             \x20 exit                  Exit the client\n\
             \n\
             Type 'help <command>' for detailed help on a specific command."
                .to_string()
        }
    }
}
