//! 與求解後端無關的模型描述（變數、限制、目標）

use ppcp_core::{Assignment, VariableKey};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;

/// 變數在模型中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// 決策變數：非負整數件數，成本 = 件數 × cost_weight
#[derive(Debug, Clone)]
pub struct DecisionVariable {
    pub key: VariableKey,
    pub cost_weight: Decimal,

    /// 取值上限（該班別的產能）
    pub upper_bound: f64,
}

impl DecisionVariable {
    pub fn cost_weight_f64(&self) -> f64 {
        self.cost_weight.to_f64().unwrap_or(0.0)
    }
}

/// 限制類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// 縫製總量 >= 需求
    Demand,
    /// 每週每資源的班別產能
    ShiftCapacity,
    /// 累計裁剪 <= 累計到貨
    MaterialAvailability,
    /// 累計縫製 <= 累計裁剪
    FlowPrecedence,
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConstraintFamily::Demand => "demand",
            ConstraintFamily::ShiftCapacity => "shift_capacity",
            ConstraintFamily::MaterialAvailability => "material_availability",
            ConstraintFamily::FlowPrecedence => "flow_precedence",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    LessOrEqual,
    GreaterOrEqual,
}

/// 線性限制：Σ coef × var (<= | >=) rhs
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    pub name: String,
    pub family: ConstraintFamily,
    pub terms: Vec<(VarId, f64)>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(
        name: String,
        family: ConstraintFamily,
        terms: Vec<(VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) -> Self {
        Self {
            name,
            family,
            terms,
            sense,
            rhs,
        }
    }

    /// 左式在給定取值下的值
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(id, coef)| coef * values.get(id.index()).copied().unwrap_or(0.0))
            .sum()
    }

    /// 給定取值是否滿足（允許 tolerance 的誤差）
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.evaluate(values);
        match self.sense {
            Sense::LessOrEqual => lhs <= self.rhs + tolerance,
            Sense::GreaterOrEqual => lhs >= self.rhs - tolerance,
        }
    }

    /// 沒有任何變數、且 0 不滿足的限制
    pub fn is_trivially_infeasible(&self) -> bool {
        self.terms.is_empty() && !self.is_satisfied(&[], 0.0)
    }
}

/// 完整的最佳化模型（最小化 Σ cost_weight × var）
#[derive(Debug, Clone, Default)]
pub struct ModelSpec {
    variables: Vec<DecisionVariable>,
    index: HashMap<VariableKey, VarId>,
    constraints: Vec<LinearConstraint>,
}

impl ModelSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入變數；相同鍵只會建立一次
    pub fn add_variable(&mut self, key: VariableKey, cost_weight: Decimal, upper_bound: f64) -> VarId {
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = VarId(self.variables.len());
        self.index.insert(key.clone(), id);
        self.variables.push(DecisionVariable {
            key,
            cost_weight,
            upper_bound,
        });
        id
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&DecisionVariable> {
        self.variables.get(id.index())
    }

    /// 依鍵查找變數；不存在表示該組合不適用（資源不能加工該布料）
    pub fn var_id(&self, key: &VariableKey) -> Option<VarId> {
        self.index.get(key).copied()
    }

    /// 找出符合條件的所有變數
    pub fn select(&self, predicate: impl Fn(&VariableKey) -> bool) -> Vec<VarId> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| predicate(&v.key))
            .map(|(i, _)| VarId(i))
            .collect()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// 某類限制的數量
    pub fn count(&self, family: ConstraintFamily) -> usize {
        self.constraints.iter().filter(|c| c.family == family).count()
    }

    /// 第一個不需求解即可判定不可行的限制
    pub fn trivially_infeasible(&self) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.is_trivially_infeasible())
    }

    /// 目標值
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(v, value)| v.cost_weight_f64() * value)
            .sum()
    }

    /// 違反的限制（用於檢查後端輸出）
    pub fn violated(&self, values: &[f64], tolerance: f64) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .collect()
    }

    /// 將後端取值對應回變數鍵
    pub fn assignments(&self, values: &[f64]) -> Vec<Assignment> {
        self.variables
            .iter()
            .zip(values)
            .map(|(v, value)| Assignment {
                key: v.key.clone(),
                value: *value,
                cost_weight: v.cost_weight,
            })
            .collect()
    }
}
