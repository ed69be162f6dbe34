use bevy::prelude::*;

/// 面向玩家的一行反馈，由 main 打印为 `> ...`
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

impl LogEvent {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// 进入游戏时提示可用命令
pub fn announce_ready(mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent::new("武器背包系统已就绪，输入 help 查看命令"));
}
