use crate::inventory::mediator::UseAction;

/// 命令行里的动作名
pub fn parse_use_action(word: &str) -> Option<UseAction> {
    match word {
        "fire" => Some(UseAction::PrimaryStarted),
        "cease" => Some(UseAction::PrimaryCanceled),
        "aim" => Some(UseAction::SecondaryStarted),
        "unaim" => Some(UseAction::SecondaryCanceled),
        _ => None,
    }
}

pub fn describe_use_action(action: UseAction) -> &'static str {
    match action {
        UseAction::PrimaryStarted => "开火",
        UseAction::PrimaryCanceled => "停火",
        UseAction::SecondaryStarted => "开镜",
        UseAction::SecondaryCanceled => "收镜",
    }
}
