use bevy::prelude::*;

/// 控件在画布上的位置与所属父节点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetTransform {
    pub position: Vec2,
    pub parent: Entity,
}

/// 控件显示的内容，始终与控件存放的物品一致
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDisplay {
    pub icon: Option<String>,
    pub label: String,
    pub alpha: f32,
}

impl SlotDisplay {
    pub fn cleared(alpha: f32) -> Self {
        Self {
            icon: None,
            label: String::new(),
            alpha,
        }
    }
}

/// 控件状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Occupied,
    Dragging,
}

/// 可拖拽控件的拖拽记录
#[derive(Debug, Clone)]
pub struct Draggable {
    pub transform: WidgetTransform,
    snapshot: Option<WidgetTransform>,
    success: bool,
    drag_alpha: Option<f32>,
    blocks_pointer: bool,
    /// 固定格子的停放位置，拖拽结束后总是回到这里
    anchor: Option<WidgetTransform>,
}

impl Draggable {
    pub fn new(transform: WidgetTransform) -> Self {
        Self {
            transform,
            snapshot: None,
            success: false,
            drag_alpha: None,
            blocks_pointer: true,
            anchor: None,
        }
    }

    /// 固定在面板上的格子：内容可以被拖走，格子本身不离开原位
    pub fn anchored(home: WidgetTransform) -> Self {
        Self {
            anchor: Some(home),
            ..Self::new(home)
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn blocks_pointer(&self) -> bool {
        self.blocks_pointer
    }

    /// 拖拽中用半透明覆盖静止时的透明度
    pub fn effective_alpha(&self, resting: f32) -> f32 {
        self.drag_alpha.unwrap_or(resting)
    }

    /// 记下原位置，挂到顶层 overlay 上以免被其他格子遮住
    pub fn begin(&mut self, overlay: Entity, alpha: f32) {
        self.snapshot = Some(self.transform);
        self.success = false;
        self.blocks_pointer = false;
        self.drag_alpha = Some(alpha);
        self.transform.parent = overlay;
    }

    pub fn drag(&mut self, delta: Vec2, scale_factor: f32) {
        if self.is_dragging() {
            self.transform.position += delta * scale_factor;
        }
    }

    /// 由放置目标在领域操作成功后调用
    pub fn mark_success(&mut self) {
        if self.is_dragging() {
            self.success = true;
        }
    }

    /// 结束拖拽；未成功时回到原位，返回是否回退
    ///
    /// 固定格子即使成功也回到停放位置。
    pub fn end(&mut self) -> bool {
        self.blocks_pointer = true;
        self.drag_alpha = None;
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        if self.success {
            if let Some(anchor) = self.anchor {
                self.transform = anchor;
            }
            return false;
        }
        self.transform = snapshot;
        true
    }

    /// 回到给定的停放位置（格子内容被交换后）
    pub fn rehome(&mut self, home: WidgetTransform) {
        if !self.is_dragging() {
            self.transform = home;
        }
    }
}

/// 画布上几个固定的父节点
#[derive(Resource, Debug, Clone, Copy)]
pub struct UiRoot {
    pub canvas: Entity,
    pub overlay: Entity,
    pub weapon_panel: Entity,
    pub backpack_panel: Entity,
    pub ground_panel: Entity,
}

impl Default for UiRoot {
    fn default() -> Self {
        Self {
            canvas: Entity::PLACEHOLDER,
            overlay: Entity::PLACEHOLDER,
            weapon_panel: Entity::PLACEHOLDER,
            backpack_panel: Entity::PLACEHOLDER,
            ground_panel: Entity::PLACEHOLDER,
        }
    }
}
