//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::{events::LogEvent, states::AppState};
use crate::data::{ItemCatalog, uuid_from_id};
use crate::equipment::actions::parse_use_action;
use crate::equipment::events::*;
use crate::inventory::events::*;
use crate::inventory::mediator::UseAction;
use crate::items::{ItemId, ItemRegistry, SpawnItemEvent};
use crate::ui::gestures::{Gesture, GestureEvent, PointerButton};
use crate::ui::widget::SlotWidget;

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 每次 drag 命令模拟的指针位移
const DRAG_STEP: Vec2 = Vec2::new(24.0, -16.0);

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match buffer.lock() {
                        Ok(mut buf) => buf.push_back(line.to_string()),
                        Err(_) => break,
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                (execute_cli_commands, execute_widget_commands)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Spawn(String),
    World,
    Inventory,
    Snapshot,
    Collect(ItemId),
    Drop(ItemId),
    Hold(usize),
    PutAway,
    Use(UseAction),
    Attach { attachment: ItemId, weapon: ItemId },
    Detach(ItemId),
    Widgets,
    Click { widget: String, button: PointerButton },
    DragTo { source: String, target: String },
    /// 参数缺失或格式不对
    Usage(&'static str),
    Unsupported(String),
}

impl Command {
    fn is_widget_command(&self) -> bool {
        matches!(
            self,
            Command::Widgets | Command::Click { .. } | Command::DragTo { .. }
        )
    }
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

const HELP: &str = "命令列表:
  help                     查看帮助
  status                   查看当前状态
  exit / quit              退出程序
  items [token]            列出物品定义 / 用 id、uuid、名称查询
  spawn <id>               在地上生成物品
  world                    列出地上的物品
  inventory                查看背包
  snapshot                 以 JSON 导出背包
  collect <#item>          拾取
  drop <#item>             丢弃
  hold <slot>              拿起武器栏里的枪
  putaway                  收起手上的物品
  fire / cease / aim / unaim
  attach <#配件> <#枪>     安装配件
  detach <#配件>           卸下配件
  widgets                  列出界面控件
  click <控件> [right|left]
  drag <控件> <控件>       把前一个拖到后一个上";

#[allow(clippy::too_many_arguments)]
fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    mut next: ResMut<NextState<AppState>>,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    registry: Res<ItemRegistry>,
    mut ev_spawn: EventWriter<SpawnItemEvent>,
    mut inv_events: (
        EventWriter<CollectItemEvent>,
        EventWriter<DropItemEvent>,
        EventWriter<ListInventoryEvent>,
        EventWriter<SnapshotInventoryEvent>,
    ),
    mut eq_events: (
        EventWriter<HoldEvent>,
        EventWriter<PutAwayEvent>,
        EventWriter<UseEvent>,
        EventWriter<AttachEvent>,
        EventWriter<DetachEvent>,
    ),
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent::new(HELP));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}, On Ground: {}",
                    state.get(),
                    catalog.len(),
                    registry.in_world().count()
                )));
            }

            Command::Exit => {
                log.write(LogEvent::new("Bye~"));
                next.set(AppState::Shutdown);
                app_exit.write(AppExit::Success);
            }

            Command::Items(None) => {
                for def in catalog.iter() {
                    log.write(LogEvent(format!(
                        "{} | {} | {} | {}",
                        uuid_from_id(&def.id),
                        def.id,
                        def.name,
                        def.ui_tag
                    )));
                }
            }

            Command::Items(Some(token)) => match catalog.find(&token) {
                Some(def) => {
                    log.write(LogEvent(format!(
                        "==================================================
UUID : {}
ID   : {}
Name : {}
Tag  : {} / {}
==================================================",
                        uuid_from_id(&def.id),
                        def.id,
                        def.name,
                        def.ui_tag,
                        def.item_tag
                    )));
                }
                None => {
                    log.write(LogEvent::new("未找到匹配物品"));
                }
            },

            Command::Spawn(id) => {
                ev_spawn.write(SpawnItemEvent { id });
            }

            Command::World => {
                let mut any = false;
                for item in registry.in_world() {
                    any = true;
                    log.write(LogEvent(format!(
                        "#{item} {}",
                        registry.name(item).unwrap_or("?")
                    )));
                }
                if !any {
                    log.write(LogEvent::new("地上什么也没有"));
                }
            }

            Command::Inventory => {
                inv_events.2.write(ListInventoryEvent);
            }
            Command::Snapshot => {
                inv_events.3.write(SnapshotInventoryEvent);
            }
            Command::Collect(item) => {
                inv_events.0.write(CollectItemEvent { item });
            }
            Command::Drop(item) => {
                inv_events.1.write(DropItemEvent { item });
            }

            Command::Hold(slot) => {
                eq_events.0.write(HoldEvent { slot });
            }
            Command::PutAway => {
                eq_events.1.write(PutAwayEvent);
            }
            Command::Use(action) => {
                eq_events.2.write(UseEvent { action });
            }
            Command::Attach { attachment, weapon } => {
                eq_events.3.write(AttachEvent { attachment, weapon });
            }
            Command::Detach(attachment) => {
                eq_events.4.write(DetachEvent { attachment });
            }

            Command::Usage(usage) => {
                log.write(LogEvent(format!("用法: {usage}")));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }

            // 控件命令由 execute_widget_commands 处理
            _ => {}
        }
    }
}

/// 控件相关命令：翻译成手势事件交给界面分派器
fn execute_widget_commands(
    mut line_reader: EventReader<CliLine>,
    widgets: Query<(Entity, &SlotWidget)>,
    mut gestures: EventWriter<GestureEvent>,
    mut log: EventWriter<LogEvent>,
) {
    let find = |handle: &str| {
        widgets
            .iter()
            .find(|(_, w)| w.handle().eq_ignore_ascii_case(handle))
            .map(|(entity, _)| entity)
    };

    for CliLine(input) in line_reader.read() {
        let command = parse_command(input);
        if !command.is_widget_command() {
            continue;
        }
        match command {
            Command::Widgets => {
                let mut rows: Vec<_> = widgets.iter().map(|(_, w)| w).collect();
                rows.sort_by_key(|w| w.handle());
                for w in rows {
                    let display = w.display();
                    log.write(LogEvent(format!(
                        "{:<6} {:?} {} alpha={:.2}",
                        w.handle(),
                        w.state(),
                        if display.label.is_empty() {
                            display.icon.as_deref().unwrap_or("-")
                        } else {
                            display.label.as_str()
                        },
                        w.alpha()
                    )));
                }
            }

            Command::Click { widget, button } => {
                let Some(target) = find(&widget) else {
                    log.write(LogEvent(format!("没有控件 {widget}")));
                    continue;
                };
                gestures.write(GestureEvent {
                    target,
                    gesture: Gesture::PointerDown(button),
                });
            }

            Command::DragTo { source, target } => {
                let (Some(from), Some(to)) = (find(&source), find(&target)) else {
                    log.write(LogEvent(format!("没有控件 {source} / {target}")));
                    continue;
                };
                gestures.write_batch([
                    GestureEvent {
                        target: from,
                        gesture: Gesture::BeginDrag,
                    },
                    GestureEvent {
                        target: from,
                        gesture: Gesture::Drag { delta: DRAG_STEP },
                    },
                    GestureEvent {
                        target: to,
                        gesture: Gesture::Drop { source: from },
                    },
                    GestureEvent {
                        target: from,
                        gesture: Gesture::EndDrag,
                    },
                ]);
            }

            _ => {}
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

/// `#12` 和 `12` 都可以
fn parse_item_id(token: Option<&str>) -> Option<ItemId> {
    token?.trim_start_matches('#').parse().ok().map(ItemId)
}

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => {
            let token = parts.next().map(|s| s.to_string());
            Command::Items(token)
        }
        "spawn" => match parts.next() {
            Some(id) => Command::Spawn(id.to_string()),
            None => Command::Usage("spawn <id>"),
        },
        "world" | "ground" => Command::World,
        "inventory" | "inv" => Command::Inventory,
        "snapshot" | "json" => Command::Snapshot,
        "collect" | "pick" => match parse_item_id(parts.next()) {
            Some(item) => Command::Collect(item),
            None => Command::Usage("collect <#item>"),
        },
        "drop" => match parse_item_id(parts.next()) {
            Some(item) => Command::Drop(item),
            None => Command::Usage("drop <#item>"),
        },
        "hold" => match parts.next().and_then(|s| s.parse().ok()) {
            Some(slot) => Command::Hold(slot),
            None => Command::Usage("hold <slot>"),
        },
        "putaway" | "holster" => Command::PutAway,
        "attach" => match (parse_item_id(parts.next()), parse_item_id(parts.next())) {
            (Some(attachment), Some(weapon)) => Command::Attach { attachment, weapon },
            _ => Command::Usage("attach <#配件> <#枪>"),
        },
        "detach" => match parse_item_id(parts.next()) {
            Some(item) => Command::Detach(item),
            None => Command::Usage("detach <#配件>"),
        },
        "widgets" | "ui" => Command::Widgets,
        "click" => {
            let Some(widget) = parts.next() else {
                return Command::Usage("click <控件> [right|left]");
            };
            let button = match parts.next().unwrap_or("right") {
                "left" | "l" => PointerButton::Left,
                "right" | "r" => PointerButton::Right,
                "middle" | "m" => PointerButton::Middle,
                _ => return Command::Usage("click <控件> [right|left]"),
            };
            Command::Click {
                widget: widget.to_string(),
                button,
            }
        }
        "drag" => match (parts.next(), parts.next()) {
            (Some(source), Some(target)) => Command::DragTo {
                source: source.to_string(),
                target: target.to_string(),
            },
            _ => Command::Usage("drag <控件> <控件>"),
        },
        other => match parse_use_action(other) {
            Some(action) => Command::Use(action),
            None => Command::Unsupported(other.into()),
        },
    }
}
