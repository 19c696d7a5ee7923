//! Generic add/remove commands for the element lists of a model.
//!
//! Every element kind that lives in a `Vec` of a [`Board`] or
//! [`Schematic`] implements [`ModelItem`]; [`CmdItemAdd`] and
//! [`CmdItemRemove`] then give the matching pair of reversible commands. A
//! removed element is re-inserted at its former index on undo, so undo
//! restores the model exactly.

use std::marker::PhantomData;
use uuid::Uuid;

use crate::core::{EditError, EditResult};
use crate::model::{
    AnchorRef, Board, Device, Hole, LibDevice, LibPackage, NetClass, NetSegment, NetSignal,
    Plane, Polygon, Schematic, SchematicNetSegment, StrokeText,
};
use crate::undo::UndoCommand;

pub trait ModelItem<M>: Clone + 'static {
    const KIND: &'static str;

    fn item_uuid(&self) -> Uuid;
    fn collection(model: &M) -> &Vec<Self>;
    fn collection_mut(model: &mut M) -> &mut Vec<Self>;

    /// Preconditions for adding the item to `model`.
    fn check_add(&self, _model: &M) -> EditResult<()> {
        Ok(())
    }

    /// Preconditions for removing the item from `model`.
    fn check_remove(&self, _model: &M) -> EditResult<()> {
        Ok(())
    }
}

pub struct CmdItemAdd<M, T> {
    text: String,
    item: T,
    _model: PhantomData<fn(&mut M)>,
}

impl<M, T: ModelItem<M>> CmdItemAdd<M, T> {
    pub fn new(item: T) -> Self {
        Self {
            text: format!("Add {}", T::KIND),
            item,
            _model: PhantomData,
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    fn add(&self, model: &mut M) -> EditResult<()> {
        let uuid = self.item.item_uuid();
        if T::collection(model).iter().any(|i| i.item_uuid() == uuid) {
            return Err(EditError::DuplicateElement { kind: T::KIND, uuid });
        }
        self.item.check_add(model)?;
        T::collection_mut(model).push(self.item.clone());
        Ok(())
    }
}

impl<M, T: ModelItem<M>> UndoCommand<M> for CmdItemAdd<M, T> {
    fn text(&self) -> &str {
        &self.text
    }

    fn perform_execute(&mut self, model: &mut M) -> EditResult<bool> {
        self.add(model)?;
        Ok(true)
    }

    fn perform_undo(&mut self, model: &mut M) -> EditResult<()> {
        let uuid = self.item.item_uuid();
        let items = T::collection_mut(model);
        let index = items
            .iter()
            .position(|i| i.item_uuid() == uuid)
            .ok_or(EditError::ElementNotFound { kind: T::KIND, uuid })?;
        items.remove(index);
        Ok(())
    }

    fn perform_redo(&mut self, model: &mut M) -> EditResult<()> {
        self.add(model)
    }
}

pub struct CmdItemRemove<M, T> {
    text: String,
    uuid: Uuid,
    removed: Option<(usize, T)>,
    _model: PhantomData<fn(&mut M)>,
}

impl<M, T: ModelItem<M>> CmdItemRemove<M, T> {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            text: format!("Remove {}", T::KIND),
            uuid,
            removed: None,
            _model: PhantomData,
        }
    }

    fn remove(&mut self, model: &mut M) -> EditResult<()> {
        let index = T::collection(model)
            .iter()
            .position(|i| i.item_uuid() == self.uuid)
            .ok_or(EditError::ElementNotFound {
                kind: T::KIND,
                uuid: self.uuid,
            })?;
        T::collection(model)[index].check_remove(model)?;
        let item = T::collection_mut(model).remove(index);
        self.removed = Some((index, item));
        Ok(())
    }
}

impl<M, T: ModelItem<M>> UndoCommand<M> for CmdItemRemove<M, T> {
    fn text(&self) -> &str {
        &self.text
    }

    fn perform_execute(&mut self, model: &mut M) -> EditResult<bool> {
        self.remove(model)?;
        Ok(true)
    }

    fn perform_undo(&mut self, model: &mut M) -> EditResult<()> {
        let (index, item) = self
            .removed
            .take()
            .ok_or_else(|| EditError::logic(format!("{} was not removed", T::KIND)))?;
        let items = T::collection_mut(model);
        let index = index.min(items.len());
        items.insert(index, item);
        Ok(())
    }

    fn perform_redo(&mut self, model: &mut M) -> EditResult<()> {
        self.remove(model)
    }
}

pub type CmdNetSegmentAdd = CmdItemAdd<Board, NetSegment>;
pub type CmdNetSegmentRemove = CmdItemRemove<Board, NetSegment>;
pub type CmdDeviceInstanceAdd = CmdItemAdd<Board, Device>;
pub type CmdDeviceInstanceRemove = CmdItemRemove<Board, Device>;
pub type CmdPlaneAdd = CmdItemAdd<Board, Plane>;
pub type CmdPlaneRemove = CmdItemRemove<Board, Plane>;
pub type CmdPolygonAdd = CmdItemAdd<Board, Polygon>;
pub type CmdPolygonRemove = CmdItemRemove<Board, Polygon>;
pub type CmdStrokeTextAdd = CmdItemAdd<Board, StrokeText>;
pub type CmdStrokeTextRemove = CmdItemRemove<Board, StrokeText>;
pub type CmdHoleAdd = CmdItemAdd<Board, Hole>;
pub type CmdHoleRemove = CmdItemRemove<Board, Hole>;
pub type CmdNetClassAdd = CmdItemAdd<Board, NetClass>;
pub type CmdNetSignalAdd = CmdItemAdd<Board, NetSignal>;
pub type CmdLibDeviceAdd = CmdItemAdd<Board, LibDevice>;
pub type CmdLibPackageAdd = CmdItemAdd<Board, LibPackage>;
pub type CmdSchematicNetSegmentAdd = CmdItemAdd<Schematic, SchematicNetSegment>;
pub type CmdSchematicNetSegmentRemove = CmdItemRemove<Schematic, SchematicNetSegment>;

fn require_layer(board: &Board, layer: &str) -> EditResult<()> {
    if board.has_layer(layer) {
        Ok(())
    } else {
        Err(EditError::UnknownLayer(layer.to_string()))
    }
}

/// A segment is consistent with `board` if its net signal exists and every
/// trace lies on a known layer and ends at a junction or via of the segment
/// or at a pad of a placed device.
pub(crate) fn validate_net_segment(board: &Board, segment: &NetSegment) -> EditResult<()> {
    if board.circuit.net_signal(&segment.net_signal).is_none() {
        return Err(EditError::ElementNotFound {
            kind: "net signal",
            uuid: segment.net_signal,
        });
    }
    for trace in &segment.traces {
        require_layer(board, &trace.layer)?;
        for anchor in [&trace.start, &trace.end] {
            let live = match anchor {
                AnchorRef::Junction(uuid) => segment.junction(uuid).is_some(),
                AnchorRef::Via(uuid) => segment.via(uuid).is_some(),
                AnchorRef::Pad { device, pad } => board.pad_anchor(device, pad).is_some(),
            };
            if !live {
                return Err(EditError::UnresolvedAnchor(*anchor));
            }
        }
    }
    Ok(())
}

impl ModelItem<Board> for NetSegment {
    const KIND: &'static str = "net segment";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.net_segments
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.net_segments
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        validate_net_segment(model, self)
    }
}

impl ModelItem<Board> for Device {
    const KIND: &'static str = "device";

    fn item_uuid(&self) -> Uuid {
        self.component
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.devices
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.devices
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        if model.circuit.component(&self.component).is_none() {
            return Err(EditError::ElementNotFound {
                kind: "component",
                uuid: self.component,
            });
        }
        if model.library.device(&self.lib_device).is_none() {
            return Err(EditError::ElementNotFound {
                kind: "library device",
                uuid: self.lib_device,
            });
        }
        for text in &self.stroke_texts {
            require_layer(model, &text.layer)?;
        }
        Ok(())
    }

    fn check_remove(&self, model: &Board) -> EditResult<()> {
        let attached = model.traces_of_device(&self.component).len();
        if attached > 0 {
            return Err(EditError::logic(format!(
                "device {} still has {} trace(s) attached",
                self.component, attached
            )));
        }
        Ok(())
    }
}

impl ModelItem<Board> for Plane {
    const KIND: &'static str = "plane";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.planes
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.planes
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        require_layer(model, &self.layer)?;
        if model.circuit.net_signal(&self.net_signal).is_none() {
            return Err(EditError::ElementNotFound {
                kind: "net signal",
                uuid: self.net_signal,
            });
        }
        Ok(())
    }
}

impl ModelItem<Board> for Polygon {
    const KIND: &'static str = "polygon";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.polygons
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.polygons
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        require_layer(model, &self.layer)
    }
}

impl ModelItem<Board> for StrokeText {
    const KIND: &'static str = "stroke text";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.stroke_texts
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.stroke_texts
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        require_layer(model, &self.layer)
    }
}

impl ModelItem<Board> for Hole {
    const KIND: &'static str = "hole";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.holes
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.holes
    }
}

impl ModelItem<Board> for NetClass {
    const KIND: &'static str = "net class";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.circuit.net_classes
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.circuit.net_classes
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        if model.circuit.net_class_by_name(&self.name).is_some() {
            return Err(EditError::logic(format!("net class \"{}\" exists", self.name)));
        }
        Ok(())
    }
}

impl ModelItem<Board> for NetSignal {
    const KIND: &'static str = "net signal";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.circuit.net_signals
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.circuit.net_signals
    }

    fn check_add(&self, model: &Board) -> EditResult<()> {
        if !model.circuit.net_classes.iter().any(|c| c.uuid == self.net_class) {
            return Err(EditError::ElementNotFound {
                kind: "net class",
                uuid: self.net_class,
            });
        }
        if model.circuit.net_signal_by_name(&self.name).is_some() {
            return Err(EditError::logic(format!("net signal \"{}\" exists", self.name)));
        }
        Ok(())
    }
}

impl ModelItem<Board> for LibDevice {
    const KIND: &'static str = "library device";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.library.devices
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.library.devices
    }
}

impl ModelItem<Board> for LibPackage {
    const KIND: &'static str = "library package";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Board) -> &Vec<Self> {
        &model.library.packages
    }

    fn collection_mut(model: &mut Board) -> &mut Vec<Self> {
        &mut model.library.packages
    }
}

impl ModelItem<Schematic> for SchematicNetSegment {
    const KIND: &'static str = "schematic net segment";

    fn item_uuid(&self) -> Uuid {
        self.uuid
    }

    fn collection(model: &Schematic) -> &Vec<Self> {
        &model.net_segments
    }

    fn collection_mut(model: &mut Schematic) -> &mut Vec<Self> {
        &mut model.net_segments
    }

    fn check_add(&self, model: &Schematic) -> EditResult<()> {
        for netline in &self.netlines {
            for anchor in [&netline.start, &netline.end] {
                let live = match anchor {
                    AnchorRef::Junction(uuid) => self.junction(uuid).is_some(),
                    AnchorRef::Pad { device, pad } => model.pin_anchor(device, pad).is_some(),
                    AnchorRef::Via(_) => false,
                };
                if !live {
                    return Err(EditError::UnresolvedAnchor(*anchor));
                }
            }
        }
        Ok(())
    }
}
