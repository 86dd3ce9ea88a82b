use crate::{
    error::{Error, Result},
    sql::{
        parser::ast,
        plan::{Node, Plan},
        schema::{self, Table},
    },
};

/// Query planner - converts AST into execution plan nodes
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self {}
    }

    /// Builds an execution plan from an AST statement
    pub fn build(&mut self, stmt: ast::Statement) -> Result<Plan> {
        Ok(Plan(self.build_statement(stmt)?))
    }

    pub fn build_statement(&self, stmt: ast::Statement) -> Result<Node> {
        Ok(match stmt {
            ast::Statement::CreateTable { name, columns } => Node::CreateTable {
                schema: Table::new(
                    name,
                    columns
                        .into_iter()
                        .map(|c| schema::Column {
                            name: c.name,
                            datatype: c.datatype,
                            // A primary key is never nullable, whatever was written
                            nullable: !c.primary_key && c.nullable.unwrap_or(true),
                            default: c.default,
                            primary_key: c.primary_key,
                            unique: c.unique || c.primary_key,
                        })
                        .collect(),
                )?,
            },
            ast::Statement::CreateIndex { name, table_name, columns } => Node::CreateIndex {
                name,
                table_name,
                columns,
            },
            ast::Statement::DropTable { name } => Node::DropTable { name },
            ast::Statement::Insert { table_name, columns, values } => Node::Insert {
                table_name,
                columns: columns.unwrap_or_default(),
                values,
            },
            ast::Statement::Select {
                select,
                from,
                where_clause,
                order_by,
            } => {
                let base_table = Self::base_table(&from).to_string();
                // Build scan node from FROM clause (single table or join result)
                let mut node = self.build_from_item(from)?;

                if let Some(predicate) = where_clause {
                    node = Node::Filter {
                        source: Box::new(node),
                        predicate,
                    };
                }

                if !order_by.is_empty() {
                    node = Node::Order {
                        source: Box::new(node),
                        order_by,
                    };
                }

                Node::Projection {
                    source: Box::new(node),
                    base_table,
                    columns: select,
                }
            }
            ast::Statement::Update {
                table_name,
                columns,
                where_clause,
            } => Node::Update {
                table_name,
                columns,
                filter: where_clause,
            },
            ast::Statement::Delete {
                table_name,
                where_clause,
            } => Node::Delete {
                table_name,
                filter: where_clause,
            },
            ast::Statement::Begin | ast::Statement::Commit | ast::Statement::Rollback => {
                return Err(Error::Internal(
                    "transaction control statements are not planned".into(),
                ))
            }
        })
    }

    fn build_from_item(&self, item: ast::FromItem) -> Result<Node> {
        Ok(match item {
            ast::FromItem::Table { name } => Node::Scan { table_name: name },
            ast::FromItem::Join {
                left,
                right,
                predicate,
            } => match *right {
                ast::FromItem::Table { name } => Node::NestedLoopJoin {
                    // Recursively build join nodes (base case: single table)
                    left: Box::new(self.build_from_item(*left)?),
                    right_table: name,
                    predicate,
                },
                ast::FromItem::Join { .. } => {
                    return Err(Error::Syntax("nested join on the right side".into()))
                }
            },
        })
    }

    /// The leftmost table of a FROM clause
    fn base_table(item: &ast::FromItem) -> &str {
        match item {
            ast::FromItem::Table { name } => name,
            ast::FromItem::Join { left, .. } => Self::base_table(left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Planner;
    use crate::{
        error::{Error, Result},
        sql::{parser::Parser, plan::Node},
    };

    fn plan(sql: &str) -> Result<Node> {
        Planner::new().build_statement(Parser::new(sql).parse()?)
    }

    #[test]
    fn test_create_table_flags() -> Result<()> {
        let Node::CreateTable { schema } = plan("CREATE TABLE t (id INTEGER PRIMARY KEY NULL, code TEXT UNIQUE, n INT NOT NULL)")? else {
            panic!("expected CreateTable");
        };
        let id = &schema.columns[0];
        assert!(id.primary_key && id.unique && !id.nullable);
        let code = &schema.columns[1];
        assert!(code.unique && code.nullable && !code.primary_key);
        assert!(!schema.columns[2].nullable);
        assert_eq!(schema.indexes.len(), 2);

        assert!(matches!(
            plan("CREATE TABLE t (a INTEGER PRIMARY KEY, b INTEGER PRIMARY KEY)"),
            Err(Error::Schema(_))
        ));
        Ok(())
    }

    #[test]
    fn test_select_pipeline_order() -> Result<()> {
        let node = plan("SELECT a FROM t JOIN u WHERE a = 1 ORDER BY a")?;
        let Node::Projection { source, base_table, columns } = node else {
            panic!("expected Projection");
        };
        assert_eq!(base_table, "t");
        assert_eq!(columns, vec!["a".to_string()]);
        let Node::Order { source, .. } = *source else {
            panic!("expected Order");
        };
        let Node::Filter { source, .. } = *source else {
            panic!("expected Filter");
        };
        assert!(matches!(*source, Node::NestedLoopJoin { ref right_table, .. } if right_table == "u"));
        Ok(())
    }

    #[test]
    fn test_transaction_statements_not_planned() {
        assert!(matches!(plan("BEGIN"), Err(Error::Internal(_))));
    }
}
